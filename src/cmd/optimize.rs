use crate::reports;
use clap::{ArgMatches, Args};
use fnv::FnvHashSet;
use pciforge::config::Config;
use pciforge::error::PfResult;
use pciforge::geometry;
use pciforge::optimizer::Optimizer;
use pciforge::oracle::ModulusOracle;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// Cell snapshot (.json array or .csv with header)
    #[arg(long)]
    pub cells: PathBuf,

    /// JSON config file; explicit flags still override it
    #[arg(long = "config")]
    pub config_path: Option<PathBuf>,

    /// Write the full result as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fill missing azimuths from towerType and sector number
    #[arg(long, default_value_t = false)]
    pub infer_azimuth: bool,

    /// Rows shown in the change and score tables
    #[arg(long, default_value_t = 25)]
    pub top: usize,

    #[command(flatten)]
    pub config: Config,
}

pub async fn run(args: OptimizeArgs, matches: Option<&ArgMatches>) -> PfResult<()> {
    let config = match &args.config_path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            let mut cfg = Config::load_from_file(path)?;
            if let Some(m) = matches {
                cfg.merge_from_cli(&args.config, m);
            }
            cfg
        }
        None => args.config.clone(),
    };
    config.validate()?;

    info!("Loading cells from {}", args.cells.display());
    let mut cells = geometry::load_cells(&args.cells)?;
    if args.infer_azimuth {
        geometry::infer_azimuths(&mut cells);
    }

    let oracle = ModulusOracle::new(config.weights.neighbor_radius_m);
    let optimizer = Optimizer::new(oracle, &config);
    let result = optimizer.optimize(&cells, config.search.check_los).await?;

    reports::print_summary(&result);
    reports::print_history(&result.convergence_history);
    reports::print_changes(&result.changes, args.top);

    let mut seen = FnvHashSet::default();
    let breakdown: Vec<_> = result
        .changes
        .iter()
        .rev()
        .filter(|c| seen.insert(c.cell_id.as_str()))
        .filter_map(|c| result.optimized_cells.iter().find(|cell| cell.id == c.cell_id))
        .take(args.top)
        .map(|cell| {
            let details = optimizer
                .scorer()
                .score_debug(&result.optimized_cells, cell, cell.pci);
            (cell.id.clone(), cell.pci, details)
        })
        .collect();
    reports::print_score_breakdown(&breakdown);

    if let Some(out) = &args.output {
        fs::write(out, serde_json::to_string_pretty(&result)?)?;
        info!("Result written to {}", out.display());
    }

    Ok(())
}
