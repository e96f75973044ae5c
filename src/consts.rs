/// Lowest PCI the optimizer will ever hand out.
/// 0..=29 are reserved for a separate (WISP) allocation scheme.
pub const PCI_MIN: u16 = 30;

/// Highest valid LTE Physical Cell Identity.
pub const PCI_MAX: u16 = 503;

/// Hard cap on optimization iterations per run.
pub const MAX_ITERATIONS: usize = 20;

/// Cells within this radius of a target are its scoring neighbors.
pub const NEIGHBOR_RADIUS_M: f64 = 10_000.0;

/// Two sectors of the same eNodeB closer than this share a tower.
pub const COLOCATION_RADIUS_M: f64 = 50.0;

/// Upper bound on the candidate list produced for a single cell.
pub const BULK_CANDIDATE_LIMIT: usize = 50;

/// Per mod-3 class cap for the diversity tier of bulk generation.
pub const MOD3_CLASS_CAP: usize = 30;

/// Number of random draws in the sampling tier.
pub const RANDOM_SAMPLE_DRAWS: usize = 30;

/// Maximum offset explored by the sequential tier (current ± 1..=50).
pub const SEQUENTIAL_MAX_OFFSET: u16 = 50;

pub const DEFAULT_AZIMUTH_DEG: f64 = 0.0;
pub const DEFAULT_BEAMWIDTH_DEG: f64 = 65.0;

/// Mean Earth radius used by the haversine distance.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Same-tower sectors within this many degrees of the nominal spacing are not conflicts.
pub const SECTOR_SPACING_TOLERANCE_DEG: f64 = 15.0;
