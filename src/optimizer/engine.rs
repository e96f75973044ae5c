use crate::geometry::Cell;
use crate::optimizer::candidates::CandidatePool;
use crate::oracle::Conflict;
use crate::scorer::Scorer;
use fastrand::Rng;
use fnv::{FnvHashMap, FnvHashSet};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChangeKind {
    /// Chosen by the scorer.
    Scored,
    /// Random stalemate breakout.
    Forced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PciChange {
    pub cell_id: String,
    #[serde(rename = "oldPCI")]
    pub old_pci: u16,
    #[serde(rename = "newPCI")]
    pub new_pci: u16,
    pub reason: String,
    pub iteration: usize,
    pub kind: ChangeKind,
}

/// Severity descending, then closest first. Stable for equal keys.
pub fn sort_by_priority(conflicts: &[Conflict]) -> Vec<&Conflict> {
    let mut sorted: Vec<&Conflict> = conflicts.iter().collect();
    sorted.sort_by(|a, b| {
        b.severity
            .rank()
            .cmp(&a.severity.rank())
            .then_with(|| a.distance.total_cmp(&b.distance))
    });
    sorted
}

/// The weaker cell (lower rsPower) gives way. Ties move the conflicting cell.
pub fn select_cell_for_reassignment(conflict: &Conflict) -> &Cell {
    if conflict.primary_cell.rs_power < conflict.conflicting_cell.rs_power {
        &conflict.primary_cell
    } else {
        &conflict.conflicting_cell
    }
}

/// Number of random breakout moves for a stalled pass.
pub fn forced_move_count(aggressive: bool, bad_iterations: usize) -> usize {
    if bad_iterations > 0 {
        8
    } else if aggressive {
        5
    } else {
        3
    }
}

/// Applies one pass of PCI reassignments to a working cell set.
pub struct ReassignmentEngine<'a> {
    scorer: &'a Scorer,
}

impl<'a> ReassignmentEngine<'a> {
    pub fn new(scorer: &'a Scorer) -> Self {
        Self { scorer }
    }

    /// Resolves `conflicts` in priority order, mutating `cells` in place.
    ///
    /// Each cell changes at most once per call. When nothing could be improved,
    /// or `aggressive` is set, the top conflicts additionally receive random
    /// diverse PCIs drawn against every PCI in the set, not only neighbors.
    pub fn resolve_conflicts(
        &self,
        cells: &mut [Cell],
        conflicts: &[Conflict],
        aggressive: bool,
        bad_iterations: usize,
        iteration: usize,
        rng: &mut Rng,
    ) -> Vec<PciChange> {
        let sorted = sort_by_priority(conflicts);
        let index: FnvHashMap<String, usize> = cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        let mut modified: FnvHashSet<String> = FnvHashSet::default();
        let mut changes = Vec::new();

        for conflict in &sorted {
            let chosen = select_cell_for_reassignment(conflict);
            if modified.contains(&chosen.id) {
                continue;
            }
            let Some(&idx) = index.get(&chosen.id) else {
                continue;
            };

            let old_pci = cells[idx].pci;
            let new_pci = self.scorer.find_optimal_pci(cells, &cells[idx], conflict, rng);
            if new_pci == old_pci {
                continue;
            }

            cells[idx].pci = new_pci;
            debug!("{}: {} -> {} ({})", chosen.id, old_pci, new_pci, conflict.conflict_type);
            changes.push(PciChange {
                cell_id: chosen.id.clone(),
                old_pci,
                new_pci,
                reason: format!(
                    "Resolved {} conflict with {}",
                    conflict.conflict_type,
                    conflict.counterpart(&chosen.id).id
                ),
                iteration,
                kind: ChangeKind::Scored,
            });
            modified.insert(chosen.id.clone());
        }

        if (changes.is_empty() && !sorted.is_empty()) || aggressive {
            let count = forced_move_count(aggressive, bad_iterations);
            debug!(
                "Breaking stalemate with {} forced reassignments (aggressive={}, bad={})",
                count, aggressive, bad_iterations
            );

            for conflict in sorted.iter().take(count) {
                let chosen = select_cell_for_reassignment(conflict);
                if modified.contains(&chosen.id) {
                    continue;
                }
                let Some(&idx) = index.get(&chosen.id) else {
                    continue;
                };

                let used: FnvHashSet<u16> = cells.iter().map(|c| c.pci).collect();
                let old_pci = cells[idx].pci;
                let new_pci = CandidatePool::new(self.scorer.range, &used)
                    .pick_diverse_random(old_pci, rng);
                if new_pci == old_pci {
                    continue;
                }

                cells[idx].pci = new_pci;
                debug!(
                    "Forced {}: {} -> {} (mod3 {} -> {})",
                    chosen.id,
                    old_pci,
                    new_pci,
                    old_pci % 3,
                    new_pci % 3
                );
                changes.push(PciChange {
                    cell_id: chosen.id.clone(),
                    old_pci,
                    new_pci,
                    reason: format!(
                        "SON random reassignment to eliminate {} {} conflict",
                        conflict.severity, conflict.conflict_type
                    ),
                    iteration,
                    kind: ChangeKind::Forced,
                });
                modified.insert(chosen.id.clone());
            }
        }

        changes
    }
}
