pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod optimizer;
pub mod oracle;
pub mod scorer;

pub use config::Config;
pub use error::{OptimizationError, PciForgeError, PfResult};
pub use geometry::Cell;
pub use optimizer::{OptimizationResult, Optimizer};
pub use oracle::{Conflict, ConflictOracle, ConflictType, ModulusOracle, Severity};
