pub mod candidates;
pub mod engine;
pub mod runner;

pub use self::candidates::{CandidatePool, PciRange, Selection};
pub use self::engine::{ChangeKind, PciChange, ReassignmentEngine};
pub use self::runner::{
    CancelToken, IterationHistory, NoProgress, OptimizationOptions, OptimizationResult,
    Optimizer, ProgressCallback, Termination,
};
