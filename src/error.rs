//! Error types shared across the crate.

use thiserror::Error;

/// Errors raised by the simulator, the estimator and the search.
///
/// Every error is local to the component that detects it; none of them is
/// recoverable by retrying since all inputs are caller-supplied constants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SarsError {
    /// A policy whose reorder point is not strictly below its order-up-to level.
    #[error("invalid policy: low ({low}) must be strictly less than top ({top})")]
    InvalidPolicy { low: f64, top: f64 },

    /// Sample variance requested from fewer than two observations.
    #[error("degenerate statistics: need at least 2 observations, got {observations}")]
    DegenerateStatistics { observations: usize },

    /// A configuration value outside its admissible range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// More replications requested than a seed cache will hold.
    #[error("replication limit exceeded: requested {requested}, limit {limit}")]
    ReplicationLimit { requested: usize, limit: usize },

    /// Demand-generation parameters the source cannot honour.
    #[error("invalid demand parameters: {0}")]
    InvalidDemand(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SarsError>;
