use crate::config::{Config, ScoringWeights};
use crate::consts::PCI_MAX;
use crate::error::OptimizationError;
use crate::geometry::{self, Cell};
use crate::optimizer::candidates::PciRange;
use crate::optimizer::engine::{PciChange, ReassignmentEngine};
use crate::oracle::{Conflict, ConflictOracle, Severity, SeverityCounts};
use crate::scorer::Scorer;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use strum_macros::Display;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct OptimizationOptions {
    pub max_iterations: usize,
    pub range: PciRange,
    pub seed: Option<u64>,
    pub max_time: Option<Duration>,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OptimizationOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            max_iterations: cfg.search.max_iterations,
            range: PciRange::new(cfg.search.pci_min, cfg.search.pci_max),
            seed: cfg.search.seed,
            max_time: cfg.search.max_time_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationHistory {
    pub iteration: usize,
    pub conflict_count: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub changes_this_iteration: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// Empty snapshot, nothing to do.
    NoInput,
    /// No conflicts of any severity left.
    Perfect,
    /// Critical and high cleared; remaining low-severity count stopped improving.
    SevereCleared,
    /// Iteration budget spent without converging.
    IterationBudget,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub original_cells: Vec<Cell>,
    pub optimized_cells: Vec<Cell>,
    pub iterations: usize,
    pub original_conflicts: usize,
    pub final_conflicts: usize,
    /// Negative when the run ended with more conflicts than it started with.
    pub resolved_conflicts: i64,
    pub conflict_reduction: f64,
    pub final_critical: usize,
    pub final_high: usize,
    pub termination: Termination,
    pub changes: Vec<PciChange>,
    pub convergence_history: Vec<IterationHistory>,
}

impl OptimizationResult {
    pub fn converged(&self) -> bool {
        self.termination != Termination::IterationBudget
    }

    fn empty() -> Self {
        Self {
            original_cells: Vec::new(),
            optimized_cells: Vec::new(),
            iterations: 0,
            original_conflicts: 0,
            final_conflicts: 0,
            resolved_conflicts: 0,
            conflict_reduction: 0.0,
            final_critical: 0,
            final_high: 0,
            termination: Termination::NoInput,
            changes: Vec::new(),
            convergence_history: Vec::new(),
        }
    }
}

/// Percentage of the original conflicts that were resolved. 0 when there were none.
pub fn conflict_reduction(original: usize, fin: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    let resolved = original as f64 - fin as f64;
    100.0 * resolved / original as f64
}

/// Receives a history entry after every completed iteration.
/// Returning `false` aborts the run.
pub trait ProgressCallback: Send + Sync {
    fn on_iteration(&self, entry: &IterationHistory) -> bool;

    /// Polled before each oracle call.
    fn is_cancelled(&self) -> bool {
        false
    }
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_iteration(&self, _entry: &IterationHistory) -> bool {
        true
    }
}

/// Shared abort flag. Clone it into another task and call [`CancelToken::cancel`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl ProgressCallback for CancelToken {
    fn on_iteration(&self, _entry: &IterationHistory) -> bool {
        !self.is_cancelled()
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Iterative PCI conflict resolver driven by an external [`ConflictOracle`].
///
/// Independent runs share nothing mutable: every call clones its input and owns
/// that working set until it returns.
pub struct Optimizer<O: ConflictOracle> {
    oracle: O,
    scorer: Scorer,
    options: OptimizationOptions,
}

impl<O: ConflictOracle> Optimizer<O> {
    pub fn new(oracle: O, config: &Config) -> Self {
        Self::with_options(oracle, config.weights.clone(), OptimizationOptions::from(config))
    }

    pub fn with_options(oracle: O, weights: ScoringWeights, options: OptimizationOptions) -> Self {
        let scorer = Scorer::new(weights, options.range);
        Self {
            oracle,
            scorer,
            options,
        }
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Runs with an RNG seeded from the options (or entropy when unset).
    pub async fn optimize(
        &self,
        cells: &[Cell],
        check_los: bool,
    ) -> Result<OptimizationResult, OptimizationError> {
        let mut rng = match self.options.seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        self.optimize_with(cells, check_los, &mut rng, &NoProgress)
            .await
    }

    pub async fn optimize_with<CB: ProgressCallback>(
        &self,
        cells: &[Cell],
        check_los: bool,
        rng: &mut fastrand::Rng,
        callback: &CB,
    ) -> Result<OptimizationResult, OptimizationError> {
        let range = self.options.range;
        if !range.is_valid() {
            return Err(OptimizationError::InvalidInput(format!(
                "PCI range {}..={} must be non-empty and within 0..={}",
                range.min, range.max, PCI_MAX
            )));
        }
        geometry::validate_cells(cells)
            .map_err(|e| OptimizationError::InvalidInput(e.to_string()))?;

        if cells.is_empty() {
            info!("Empty snapshot, nothing to optimize");
            return Ok(OptimizationResult::empty());
        }

        let opts = &self.options;
        let original_cells = cells.to_vec();
        let mut working = cells.to_vec();
        let engine = ReassignmentEngine::new(&self.scorer);
        let start_time = Instant::now();

        let mut history: Vec<IterationHistory> = Vec::new();
        let mut changes: Vec<PciChange> = Vec::new();

        let initial = self.detect(&working, check_los, 0, &history).await?;
        let initial_counts = SeverityCounts::from_conflicts(&initial);
        let original_conflicts = initial_counts.total;

        info!(
            "Starting PCI optimization: {} cells, {} conflicts ({} critical, {} high)",
            working.len(),
            original_conflicts,
            initial_counts.critical,
            initial_counts.high
        );

        let mut previous = initial_counts;
        let mut stalled_iterations = 0usize;
        let mut bad_iterations = 0usize;
        let mut iteration = 0usize;
        let mut termination = Termination::IterationBudget;

        while iteration < opts.max_iterations {
            if let Some(limit) = opts.max_time {
                if start_time.elapsed() >= limit {
                    return Err(OptimizationError::DeadlineExceeded {
                        iteration,
                        partial_history: history,
                    });
                }
            }
            if callback.is_cancelled() {
                return Err(OptimizationError::Cancelled {
                    iteration,
                    partial_history: history,
                });
            }

            iteration += 1;

            let conflicts = self.detect(&working, check_los, iteration, &history).await?;
            let counts = SeverityCounts::from_conflicts(&conflicts);
            history.push(IterationHistory {
                iteration,
                conflict_count: counts.total,
                critical_count: counts.critical,
                high_count: counts.high,
                changes_this_iteration: 0,
            });

            info!(
                "Iteration {}: {} total ({} critical, {} high, {} medium)",
                iteration, counts.total, counts.critical, counts.high, counts.medium
            );

            if iteration > 1 && (counts.critical > previous.critical || counts.high > previous.high)
            {
                bad_iterations += 1;
                stalled_iterations = 3;
                warn!(
                    "Critical/high regressed: {}/{} -> {}/{} (bad iteration #{})",
                    previous.critical, previous.high, counts.critical, counts.high, bad_iterations
                );
            }

            if counts.severe() == 0 {
                if counts.total == 0 {
                    termination = Termination::Perfect;
                    break;
                }
                if iteration > 1 && counts.total >= previous.total {
                    termination = Termination::SevereCleared;
                    break;
                }
            }

            let severe = counts.severe();
            let previous_severe = previous.severe();
            if iteration > 2 && severe >= previous_severe {
                stalled_iterations += 1;
                debug!("Severe conflicts not improving (stalled: {})", stalled_iterations);
            } else if severe < previous_severe {
                stalled_iterations = 0;
                bad_iterations = 0;
            }

            let ordered = partition_by_severity(conflicts);
            let aggressive = stalled_iterations >= 2 || bad_iterations > 0;
            if aggressive {
                debug!("Aggressive mode (stalled={}, bad={})", stalled_iterations, bad_iterations);
            }

            let applied = engine.resolve_conflicts(
                &mut working,
                &ordered,
                aggressive,
                bad_iterations,
                iteration,
                rng,
            );

            if let Some(entry) = history.last_mut() {
                entry.changes_this_iteration = applied.len();
            }
            changes.extend(applied);
            previous = counts;

            if let Some(entry) = history.last() {
                if !callback.on_iteration(entry) {
                    return Err(OptimizationError::Cancelled {
                        iteration,
                        partial_history: history,
                    });
                }
            }
        }

        let final_conflicts = self.detect(&working, check_los, iteration, &history).await?;
        let final_counts = SeverityCounts::from_conflicts(&final_conflicts);
        let resolved_conflicts = original_conflicts as i64 - final_counts.total as i64;
        let reduction = conflict_reduction(original_conflicts, final_counts.total);

        info!(
            "Optimization finished after {} iterations ({}): {} -> {} conflicts ({:.1}% reduction), critical {} -> {}, high {} -> {}, {} changes",
            iteration,
            termination,
            original_conflicts,
            final_counts.total,
            reduction,
            initial_counts.critical,
            final_counts.critical,
            initial_counts.high,
            final_counts.high,
            changes.len()
        );

        Ok(OptimizationResult {
            original_cells,
            optimized_cells: working,
            iterations: iteration,
            original_conflicts,
            final_conflicts: final_counts.total,
            resolved_conflicts,
            conflict_reduction: reduction,
            final_critical: final_counts.critical,
            final_high: final_counts.high,
            termination,
            changes,
            convergence_history: history,
        })
    }

    async fn detect(
        &self,
        cells: &[Cell],
        check_los: bool,
        iteration: usize,
        history: &[IterationHistory],
    ) -> Result<Vec<Conflict>, OptimizationError> {
        self.oracle
            .detect_conflicts(cells, check_los)
            .await
            .map_err(|source| OptimizationError::Oracle {
                iteration,
                partial_history: history.to_vec(),
                source,
            })
    }
}

/// Critical first, then high, then everything else, each group in oracle order.
fn partition_by_severity(conflicts: Vec<Conflict>) -> Vec<Conflict> {
    let (critical, rest): (Vec<_>, Vec<_>) = conflicts
        .into_iter()
        .partition(|c| c.severity == Severity::Critical);
    let (high, other): (Vec<_>, Vec<_>) = rest.into_iter().partition(|c| c.severity == Severity::High);
    critical.into_iter().chain(high).chain(other).collect()
}
