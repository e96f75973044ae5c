pub mod costs;
pub mod physics;
pub mod types;

pub use self::types::ScoreDetails;

use self::physics::analyze_interaction;
use crate::config::ScoringWeights;
use crate::geometry::Cell;
use crate::optimizer::candidates::{CandidatePool, PciRange};
use crate::oracle::Conflict;
use fastrand::Rng;
use fnv::FnvHashSet;
use rayon::prelude::*;
use tracing::trace;

/// Geometry-aware candidate scorer. Higher scores are better.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub weights: ScoringWeights,
    pub range: PciRange,
}

impl Scorer {
    pub fn new(weights: ScoringWeights, range: PciRange) -> Self {
        Self { weights, range }
    }

    /// Cells within the neighbor radius of `target`, excluding `target` itself.
    pub fn neighbors<'c>(&self, cells: &'c [Cell], target: &Cell) -> Vec<&'c Cell> {
        cells
            .iter()
            .filter(|c| c.id != target.id)
            .filter(|c| physics::distance(target, c) <= self.weights.neighbor_radius_m)
            .collect()
    }

    /// Fast path used by the search.
    pub fn score(&self, cells: &[Cell], target: &Cell, candidate: u16) -> f64 {
        let neighbors = self.neighbors(cells, target);
        self.score_against(&neighbors, target, candidate).total
    }

    /// Full per-family breakdown, used for reporting.
    pub fn score_debug(&self, cells: &[Cell], target: &Cell, candidate: u16) -> ScoreDetails {
        let neighbors = self.neighbors(cells, target);
        self.score_against(&neighbors, target, candidate)
    }

    fn score_against(&self, neighbors: &[&Cell], target: &Cell, candidate: u16) -> ScoreDetails {
        let mut d = ScoreDetails::default();
        for neighbor in neighbors {
            let m = analyze_interaction(target, neighbor, self.weights.colocation_radius_m);
            costs::accumulate_pair(&mut d, &m, candidate, neighbor.pci, &self.weights);
        }
        d.total = d.sum();
        d
    }

    /// Picks a replacement PCI for `target`.
    ///
    /// Candidates come from the pool with the used set limited to spatial
    /// neighbors. Among all candidates scoring within `selection_tolerance` of
    /// the best, one is drawn uniformly. No candidates keeps the current PCI.
    pub fn find_optimal_pci(
        &self,
        cells: &[Cell],
        target: &Cell,
        conflict: &Conflict,
        rng: &mut Rng,
    ) -> u16 {
        let neighbors = self.neighbors(cells, target);
        let used: FnvHashSet<u16> = neighbors.iter().map(|c| c.pci).collect();

        let candidates = CandidatePool::new(self.range, &used).generate(target.pci, rng);
        if candidates.is_empty() {
            trace!("No candidates for {} ({}), keeping PCI {}", target.id, conflict.id, target.pci);
            return target.pci;
        }

        let scored: Vec<(u16, f64)> = candidates
            .par_iter()
            .map(|&pci| (pci, self.score_against(&neighbors, target, pci).total))
            .collect();

        let best = scored
            .iter()
            .map(|&(_, s)| s)
            .fold(f64::NEG_INFINITY, f64::max);
        let threshold = best - best.abs() * self.weights.selection_tolerance;

        let top: Vec<u16> = scored
            .iter()
            .filter(|&&(_, s)| s >= threshold)
            .map(|&(pci, _)| pci)
            .collect();

        let choice = match top.len() {
            0 => target.pci,
            n => top[rng.usize(..n)],
        };
        trace!(
            "{} [{} {}]: {} candidates, best {:.1}, {} within tolerance -> {}",
            target.id,
            conflict.conflict_type,
            conflict.severity,
            scored.len(),
            best,
            top.len(),
            choice
        );
        choice
    }
}
