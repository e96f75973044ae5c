use crate::consts::{
    COLOCATION_RADIUS_M, MAX_ITERATIONS, NEIGHBOR_RADIUS_M, PCI_MAX, PCI_MIN,
};
use crate::error::{PciForgeError, PfResult};
use clap::parser::ValueSource;
use clap::{ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub weights: ScoringWeights,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    pub max_iterations: usize,
    #[arg(long, default_value_t = PCI_MIN)]
    pub pci_min: u16,
    #[arg(long, default_value_t = PCI_MAX)]
    pub pci_max: u16,

    /// Fixed seed for reproducible runs. Omit for entropy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Abort the run once this many seconds have elapsed.
    #[arg(long)]
    pub max_time_secs: Option<u64>,

    /// Ask the oracle for line-of-sight aware classification.
    #[arg(long, default_value_t = false)]
    pub check_los: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            pci_min: PCI_MIN,
            pci_max: PCI_MAX,
            seed: None,
            max_time_secs: None,
            check_los: false,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    // === OVERLAPPING SECTORS ===
    #[arg(long, default_value_t = 500.0)]
    pub penalty_same_pci_overlap: f64,
    #[arg(long, default_value_t = 150.0)]
    pub penalty_mod3_overlap: f64,
    #[arg(long, default_value_t = 80.0)]
    pub penalty_mod6_overlap: f64,
    #[arg(long, default_value_t = 2.0)]
    pub overlap_amplifier: f64,

    // === AZIMUTH WEIGHTED (scaled by interference factor) ===
    #[arg(long, default_value_t = 100.0)]
    pub penalty_mod3: f64,
    #[arg(long, default_value_t = 50.0)]
    pub penalty_mod6: f64,
    #[arg(long, default_value_t = 25.0)]
    pub penalty_mod12: f64,
    #[arg(long, default_value_t = 10.0)]
    pub penalty_mod30: f64,

    // === SAME TOWER ===
    #[arg(long, default_value_t = 200.0)]
    pub penalty_colocated_mod3: f64,
    #[arg(long, default_value_t = 50.0)]
    pub bonus_colocated_diverse: f64,

    // === GEOMETRY BONUSES ===
    #[arg(long, default_value_t = 20.0)]
    pub bonus_back_to_back: f64,
    #[arg(long, default_value_t = 10.0)]
    pub bonus_no_overlap: f64,

    // === RADII ===
    #[arg(long, default_value_t = NEIGHBOR_RADIUS_M)]
    pub neighbor_radius_m: f64,
    #[arg(long, default_value_t = COLOCATION_RADIUS_M)]
    pub colocation_radius_m: f64,

    /// Candidates scoring within this fraction of the best are drawn at random.
    #[arg(long, default_value_t = 0.10)]
    pub selection_tolerance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            penalty_same_pci_overlap: 500.0,
            penalty_mod3_overlap: 150.0,
            penalty_mod6_overlap: 80.0,
            overlap_amplifier: 2.0,
            penalty_mod3: 100.0,
            penalty_mod6: 50.0,
            penalty_mod12: 25.0,
            penalty_mod30: 10.0,
            penalty_colocated_mod3: 200.0,
            bonus_colocated_diverse: 50.0,
            bonus_back_to_back: 20.0,
            bonus_no_overlap: 10.0,
            neighbor_radius_m: NEIGHBOR_RADIUS_M,
            colocation_radius_m: COLOCATION_RADIUS_M,
            selection_tolerance: 0.10,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PfResult<()> {
        let s = &self.search;
        if s.pci_max > PCI_MAX {
            return Err(PciForgeError::Config(format!(
                "pci_max {} exceeds {}",
                s.pci_max, PCI_MAX
            )));
        }
        if s.pci_min > s.pci_max {
            return Err(PciForgeError::Config(format!(
                "pci_min {} is above pci_max {}",
                s.pci_min, s.pci_max
            )));
        }
        if s.max_iterations == 0 {
            return Err(PciForgeError::Config(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        let w = &self.weights;
        if w.neighbor_radius_m < 0.0 || w.colocation_radius_m < 0.0 {
            return Err(PciForgeError::Config(
                "Radii must be non-negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&w.selection_tolerance) {
            return Err(PciForgeError::Config(format!(
                "selection_tolerance {} must be within 0..=1",
                w.selection_tolerance
            )));
        }
        Ok(())
    }
}

impl ScoringWeights {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Config {
    /// Overwrites fields with values the user passed explicitly on the command line.
    /// Flags left at their clap default do not clobber a loaded config file.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(search.max_iterations);
        update_if_present!(search.pci_min);
        update_if_present!(search.pci_max);
        update_if_present!(search.seed);
        update_if_present!(search.max_time_secs);
        update_if_present!(search.check_los);

        update_if_present!(weights.penalty_same_pci_overlap);
        update_if_present!(weights.penalty_mod3_overlap);
        update_if_present!(weights.penalty_mod6_overlap);
        update_if_present!(weights.overlap_amplifier);
        update_if_present!(weights.penalty_mod3);
        update_if_present!(weights.penalty_mod6);
        update_if_present!(weights.penalty_mod12);
        update_if_present!(weights.penalty_mod30);
        update_if_present!(weights.penalty_colocated_mod3);
        update_if_present!(weights.bonus_colocated_diverse);
        update_if_present!(weights.bonus_back_to_back);
        update_if_present!(weights.bonus_no_overlap);
        update_if_present!(weights.neighbor_radius_m);
        update_if_present!(weights.colocation_radius_m);
        update_if_present!(weights.selection_tolerance);
    }
}
