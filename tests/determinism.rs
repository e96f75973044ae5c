mod common;

use common::*;
use pciforge::config::Config;
use pciforge::optimizer::Optimizer;
use pciforge::oracle::ModulusOracle;

fn dense_cluster() -> Vec<pciforge::geometry::Cell> {
    let mut cells = Vec::new();
    for site in 0..4u32 {
        for (s, az) in [0.0, 120.0, 240.0].into_iter().enumerate() {
            cells.push(
                CellBuilder::new(&format!("site{}-{}", site, s + 1), 150 + (site as u16 % 2) * 3)
                    .enodeb(site)
                    .sector(s as u32 + 1)
                    .at(0.0, site as f64 * 5.0 * DEG_PER_100M)
                    .azimuth(az)
                    .rs_power(-80.0 - site as f64)
                    .build(),
            );
        }
    }
    cells
}

async fn run(seed: u64) -> pciforge::optimizer::OptimizationResult {
    let mut cfg = Config::default();
    cfg.search.seed = Some(seed);
    Optimizer::new(ModulusOracle::default(), &cfg)
        .optimize(&dense_cluster(), false)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_same_seed_same_run() {
    let a = run(1234).await;
    let b = run(1234).await;

    assert_eq!(a.optimized_cells, b.optimized_cells);
    assert_eq!(a.changes, b.changes);
    assert_eq!(a.convergence_history, b.convergence_history);
    assert_eq!(a.termination, b.termination);
}

#[tokio::test]
async fn test_concurrent_runs_do_not_interfere() {
    let (a, b) = tokio::join!(run(77), run(77));
    assert_eq!(a.optimized_cells, b.optimized_cells);
    assert_eq!(a.changes, b.changes);
}
