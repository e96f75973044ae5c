use crate::reports;
use clap::Args;
use pciforge::consts::NEIGHBOR_RADIUS_M;
use pciforge::error::PfResult;
use pciforge::geometry;
use pciforge::oracle::ModulusOracle;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Cell snapshot (.json array or .csv with header)
    #[arg(long)]
    pub cells: PathBuf,

    #[arg(long, default_value_t = false)]
    pub infer_azimuth: bool,

    /// Pairs farther apart than this are never compared
    #[arg(long, default_value_t = NEIGHBOR_RADIUS_M)]
    pub max_distance_m: f64,

    #[arg(long, default_value_t = 25)]
    pub top: usize,
}

pub fn run(args: AnalyzeArgs) -> PfResult<()> {
    info!("Loading cells from {}", args.cells.display());
    let mut cells = geometry::load_cells(&args.cells)?;
    if args.infer_azimuth {
        geometry::infer_azimuths(&mut cells);
    }

    let conflicts = ModulusOracle::new(args.max_distance_m).detect(&cells);
    info!("{} cells, {} conflicts", cells.len(), conflicts.len());

    reports::print_conflict_summary(&conflicts);
    reports::print_conflicts(&conflicts, args.top);
    Ok(())
}
