//! Boundary to the conflict classifier.
//!
//! The optimizer never decides on its own whether two cells conflict; it asks a
//! [`ConflictOracle`] after every iteration and reacts to the severities it
//! reports. [`ModulusOracle`] is a plain-geometry classifier shipped for the CLI
//! and for tests. Production callers plug in their terrain-aware implementation.

pub mod modulus;

pub use self::modulus::ModulusOracle;

use crate::geometry::Cell;
use serde::{Deserialize, Serialize};
use std::future::Future;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unresolvable,
    None,
}

impl Severity {
    /// Triage rank: CRITICAL > HIGH > MEDIUM > LOW > UNRESOLVABLE > NONE.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 5,
            Self::High => 4,
            Self::Medium => 3,
            Self::Low => 2,
            Self::Unresolvable => 1,
            Self::None => 0,
        }
    }

    pub fn is_severe(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    Mod3,
    Mod6,
    Mod12,
    Mod30,
    Frequency,
    AdjacentChannel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub id: String,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub severity: Severity,
    pub primary_cell: Cell,
    pub conflicting_cell: Cell,
    /// Separation in meters.
    pub distance: f64,
}

impl Conflict {
    /// The cell on the other side of the conflict from `cell_id`.
    pub fn counterpart(&self, cell_id: &str) -> &Cell {
        if self.primary_cell.id == cell_id {
            &self.conflicting_cell
        } else {
            &self.primary_cell
        }
    }
}

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Terrain lookup failed: {0}")]
    Terrain(String),

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classifies pairwise PCI conflicts for a cell snapshot.
///
/// Called repeatedly against the evolving working set of a run; every call must
/// reflect the PCIs passed in, not a cached view. May be expensive and may do
/// network or terrain I/O when `check_los` is set.
pub trait ConflictOracle: Send + Sync {
    fn detect_conflicts(
        &self,
        cells: &[Cell],
        check_los: bool,
    ) -> impl Future<Output = Result<Vec<Conflict>, OracleError>> + Send;
}

/// Per-severity tallies of one oracle answer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_conflicts(conflicts: &[Conflict]) -> Self {
        let mut counts = Self {
            total: conflicts.len(),
            ..Default::default()
        };
        for c in conflicts {
            match c.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
                Severity::Unresolvable | Severity::None => {}
            }
        }
        counts
    }

    pub fn severe(&self) -> usize {
        self.critical + self.high
    }
}
