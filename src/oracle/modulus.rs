use super::{Conflict, ConflictOracle, ConflictType, OracleError, Severity};
use crate::consts::{NEIGHBOR_RADIUS_M, SECTOR_SPACING_TOLERANCE_DEG};
use crate::geometry::{Cell, TowerType};
use crate::scorer::physics::{azimuth_diff, distance};
use rayon::prelude::*;
use tracing::debug;

/// Distance thresholds (critical, high, medium) in meters.
fn thresholds(kind: ConflictType) -> (f64, f64, f64) {
    match kind {
        ConflictType::Mod3 | ConflictType::AdjacentChannel => (500.0, 1000.0, 2000.0),
        ConflictType::Mod6 => (300.0, 700.0, 1500.0),
        ConflictType::Mod12 => (200.0, 500.0, 1000.0),
        ConflictType::Mod30 => (100.0, 300.0, 600.0),
        ConflictType::Frequency => (1000.0, 2000.0, 5000.0),
    }
}

/// Severity from separation and the rsPower gap between the two cells.
pub fn classify_severity(kind: ConflictType, distance_m: f64, rs_power_a: f64, rs_power_b: f64) -> Severity {
    let (critical, high, medium) = thresholds(kind);
    let signal_gap = (rs_power_a - rs_power_b).abs();

    if distance_m < critical && signal_gap < 6.0 {
        Severity::Critical
    } else if distance_m < high && signal_gap < 9.0 {
        Severity::High
    } else if distance_m < medium && signal_gap < 12.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Modulus relations shared by two PCIs, coarsest first.
pub fn shared_moduli(a: u16, b: u16) -> impl Iterator<Item = ConflictType> {
    [
        (3, ConflictType::Mod3),
        (6, ConflictType::Mod6),
        (12, ConflictType::Mod12),
        (30, ConflictType::Mod30),
    ]
    .into_iter()
    .filter(move |&(m, _)| a % m == b % m)
    .map(|(_, kind)| kind)
}

/// Geometry-only classifier: pairwise PCI modulus checks with distance and
/// power based severity. No terrain, so `check_los` has no effect.
#[derive(Debug, Clone)]
pub struct ModulusOracle {
    pub max_distance_m: f64,
}

impl Default for ModulusOracle {
    fn default() -> Self {
        Self {
            max_distance_m: NEIGHBOR_RADIUS_M,
        }
    }
}

impl ModulusOracle {
    pub fn new(max_distance_m: f64) -> Self {
        Self { max_distance_m }
    }

    /// Synchronous scan. Sorted by severity, then by distance.
    pub fn detect(&self, cells: &[Cell]) -> Vec<Conflict> {
        let n = cells.len();
        let mut conflicts: Vec<Conflict> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| ((i + 1)..n).flat_map(move |j| self.classify_pair(&cells[i], &cells[j])))
            .collect();

        conflicts.sort_by(|a, b| {
            b.severity
                .rank()
                .cmp(&a.severity.rank())
                .then_with(|| a.distance.total_cmp(&b.distance))
        });
        conflicts
    }

    fn classify_pair(&self, a: &Cell, b: &Cell) -> Vec<Conflict> {
        let d = distance(a, b);
        if d > self.max_distance_m || is_planned_sector_spacing(a, b) {
            return Vec::new();
        }

        shared_moduli(a.pci, b.pci)
            .map(|kind| Conflict {
                id: format!("{}-{}-{}", a.id, b.id, kind),
                conflict_type: kind,
                severity: classify_severity(kind, d, a.rs_power, b.rs_power),
                primary_cell: a.clone(),
                conflicting_cell: b.clone(),
                distance: d,
            })
            .collect()
    }
}

/// Sectors of one eNodeB pointing at the nominal spacing for their tower layout
/// (120° for 3-sector, 90° for 4-sector) are deliberately planned and skipped.
fn is_planned_sector_spacing(a: &Cell, b: &Cell) -> bool {
    if a.enodeb != b.enodeb || a.sector == b.sector {
        return false;
    }
    let expected = match a.tower_type.or(b.tower_type) {
        Some(TowerType::FourSector) => 90.0,
        Some(TowerType::ThreeSector) | None => 120.0,
    };
    (azimuth_diff(a, b) - expected).abs() < SECTOR_SPACING_TOLERANCE_DEG
}

impl ConflictOracle for ModulusOracle {
    async fn detect_conflicts(&self, cells: &[Cell], check_los: bool) -> Result<Vec<Conflict>, OracleError> {
        if check_los {
            debug!("ModulusOracle has no terrain model, ignoring line-of-sight request");
        }
        Ok(self.detect(cells))
    }
}
