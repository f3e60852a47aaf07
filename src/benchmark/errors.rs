use thiserror::Error;

use crate::optimization::errors::OptError;

/// Result alias for benchmark and performance-profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors raised while assembling benchmark data or building profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A matrix or row does not have the expected `(problems, solvers)` shape.
    #[error("Shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch { what: &'static str, expected: (usize, usize), found: (usize, usize) },

    /// A solver column index is out of range.
    #[error("Unknown solver index {index}; batch has {n_solvers} solvers")]
    UnknownSolver { index: usize, n_solvers: usize },

    /// Two indices of a pair refer to the same solver.
    #[error("Solver pair must name two distinct columns, got ({first}, {second})")]
    SamePair { first: usize, second: usize },

    /// A successful run reported a metric that cannot form a ratio.
    #[error("Metric for problem {problem}, solver {solver} must be finite and positive, got {value}")]
    NonPositiveMetric { problem: usize, solver: usize, value: f64 },

    /// A batch needs at least one solver.
    #[error("A benchmark batch needs at least one solver")]
    NoSolvers,

    /// (De)serialization of benchmark data failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a benchmark file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A solver rejected its configuration.
    #[error(transparent)]
    Opt(#[from] OptError),
}
