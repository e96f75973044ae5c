mod common;

use common::DEG_PER_100M;
use fnv::FnvHashSet;
use pciforge::config::Config;
use pciforge::geometry::Cell;
use pciforge::optimizer::{CandidatePool, Optimizer, PciRange};
use pciforge::oracle::ModulusOracle;
use proptest::prelude::*;

prop_compose! {
    fn arb_cell(idx: usize)(
        pci in 0u16..=503,
        enodeb in 0u32..4,
        dlat in 0.0..20.0f64,
        dlon in 0.0..20.0f64,
        azimuth in prop::option::of(0.0..360.0f64),
        beamwidth in prop::option::of(30.0..120.0f64),
        rs_power in -100.0..-60.0f64,
    ) -> Cell {
        Cell {
            id: format!("p{}", idx),
            enodeb,
            sector: idx as u32 % 3 + 1,
            pci,
            latitude: dlat * DEG_PER_100M,
            longitude: dlon * DEG_PER_100M,
            azimuth,
            beamwidth,
            rs_power,
            tower_type: None,
        }
    }
}

fn arb_cells() -> impl Strategy<Value = Vec<Cell>> {
    (1usize..10).prop_flat_map(|n| (0..n).map(arb_cell).collect::<Vec<_>>())
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_never_assigns_reserved_pci(cells in arb_cells(), seed in any::<u64>()) {
        let mut cfg = Config::default();
        cfg.search.seed = Some(seed);
        cfg.search.max_iterations = 5;
        let opt = Optimizer::new(ModulusOracle::default(), &cfg);

        let result = runtime().block_on(opt.optimize(&cells, false)).unwrap();

        for change in &result.changes {
            prop_assert!(change.new_pci >= 30, "{} -> {}", change.cell_id, change.new_pci);
            prop_assert!(change.new_pci <= 503);
        }
        // Reserved PCIs survive only where the input already had them.
        for (before, after) in cells.iter().zip(&result.optimized_cells) {
            prop_assert!(after.pci >= 30 || after.pci == before.pci);
        }
    }

    #[test]
    fn prop_only_pci_changes(cells in arb_cells(), seed in any::<u64>()) {
        let mut cfg = Config::default();
        cfg.search.seed = Some(seed);
        cfg.search.max_iterations = 5;
        let opt = Optimizer::new(ModulusOracle::default(), &cfg);

        let result = runtime().block_on(opt.optimize(&cells, false)).unwrap();

        prop_assert_eq!(&result.original_cells, &cells);
        for (before, after) in cells.iter().zip(&result.optimized_cells) {
            let mut expected = before.clone();
            expected.pci = after.pci;
            prop_assert_eq!(&expected, after);
        }

        // A cell changes at most once per iteration.
        let mut seen = FnvHashSet::default();
        for change in &result.changes {
            prop_assert!(seen.insert((change.iteration, change.cell_id.clone())));
        }
    }

    #[test]
    fn prop_candidates_respect_range_and_used(
        current in 0u16..=503,
        used in prop::collection::hash_set(30u16..=503, 0..200),
        seed in any::<u64>(),
    ) {
        let used: FnvHashSet<u16> = used.into_iter().collect();
        let pool = CandidatePool::new(PciRange::default(), &used);
        let mut rng = fastrand::Rng::with_seed(seed);

        let candidates = pool.generate(current, &mut rng);
        prop_assert!(candidates.len() <= 50);

        let mut uniq = FnvHashSet::default();
        for pci in &candidates {
            prop_assert!((30..=503).contains(pci));
            prop_assert!(!used.contains(pci));
            prop_assert!(uniq.insert(*pci));
        }

        let forced = pool.pick_diverse_random(current, &mut rng);
        prop_assert!((30..=503).contains(&forced));
    }
}
