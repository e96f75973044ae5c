use serde::{Deserialize, Serialize};

/// Per-family breakdown of a candidate score. Penalties are stored negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub total: f64,
    pub neighbors: usize,

    // Overlapping sectors
    pub overlap_same_pci: f64,
    pub overlap_mod3: f64,
    pub overlap_mod6: f64,

    // Non-overlapping, azimuth weighted
    pub azimuth_mod3: f64,
    pub azimuth_mod6: f64,

    // Always applied
    pub mod12: f64,
    pub mod30: f64,

    // Same tower (penalty or bonus)
    pub colocated: f64,

    // Bonuses
    pub distance: f64,
    pub back_to_back: f64,
    pub no_overlap: f64,
}

impl ScoreDetails {
    pub fn sum(&self) -> f64 {
        self.overlap_same_pci
            + self.overlap_mod3
            + self.overlap_mod6
            + self.azimuth_mod3
            + self.azimuth_mod6
            + self.mod12
            + self.mod30
            + self.colocated
            + self.distance
            + self.back_to_back
            + self.no_overlap
    }
}
