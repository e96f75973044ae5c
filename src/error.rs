use crate::optimizer::IterationHistory;
use crate::oracle::OracleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PciForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Optimization Error: {0}")]
    Optimization(#[from] OptimizationError),
}

pub type PfResult<T> = Result<T, PciForgeError>;

/// Failure of a single optimization run.
///
/// Every variant raised after the run started carries the iteration it stopped
/// at and the history gathered so far. Iteration 0 is the seeding oracle call.
#[derive(Error, Debug)]
pub enum OptimizationError {
    #[error("Conflict oracle failed at iteration {iteration}: {source}")]
    Oracle {
        iteration: usize,
        partial_history: Vec<IterationHistory>,
        #[source]
        source: OracleError,
    },

    #[error("Optimization cancelled after iteration {iteration}")]
    Cancelled {
        iteration: usize,
        partial_history: Vec<IterationHistory>,
    },

    #[error("Optimization deadline exceeded at iteration {iteration}")]
    DeadlineExceeded {
        iteration: usize,
        partial_history: Vec<IterationHistory>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl OptimizationError {
    pub fn iteration(&self) -> usize {
        match self {
            Self::Oracle { iteration, .. }
            | Self::Cancelled { iteration, .. }
            | Self::DeadlineExceeded { iteration, .. } => *iteration,
            Self::InvalidInput(_) => 0,
        }
    }

    pub fn partial_history(&self) -> &[IterationHistory] {
        match self {
            Self::Oracle {
                partial_history, ..
            }
            | Self::Cancelled {
                partial_history, ..
            }
            | Self::DeadlineExceeded {
                partial_history, ..
            } => partial_history,
            Self::InvalidInput(_) => &[],
        }
    }
}
