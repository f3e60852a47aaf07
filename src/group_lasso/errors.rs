//! Errors for group-LASSO problem construction and model evaluation.
//!
//! This module defines a construction/validation error type,
//! [`ProblemError`], and a model-evaluation error type, [`ModelError`]. Both
//! are small, cloneable enums so they can be matched in tests and converted
//! into the optimizer's error surface (`OptError`) without loss.
//!
//! ## Conventions
//! - **Indices are 0-based**; group indices follow the order of the
//!   partition's block sizes.
//! - Construction errors are raised once, before any solving begins. A
//!   validated `ProblemInstance` is assumed consistent everywhere else.
//! - Model errors describe numerical conditions (e.g., an exactly-zero group
//!   slice) that make a quantity undefined at a particular point; solvers
//!   classify them into a terminal status instead of propagating NaNs.
use thiserror::Error;

/// Result alias for problem construction and validation.
pub type ProblemResult<T> = Result<T, ProblemError>;

/// Result alias for objective/gradient evaluation.
pub type ModelResult<T> = Result<T, ModelError>;

/// Configuration errors detected while building a `ProblemInstance`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProblemError {
    // ---- Partition ----
    /// Partition has no blocks.
    #[error("Partition must contain at least one block")]
    EmptyPartition,

    /// A block size is zero.
    #[error("Partition block {index} has size zero; block sizes must be positive")]
    ZeroBlock { index: usize },

    /// Block sizes do not sum to the number of coefficients.
    #[error("Partition sizes sum to {sum}, but the design matrix has {n} columns")]
    PartitionSumMismatch { sum: usize, n: usize },

    // ---- Shapes ----
    /// Design matrix has no rows or no columns.
    #[error("Design matrix must be non-empty, found shape ({rows}, {cols})")]
    EmptyDesign { rows: usize, cols: usize },

    /// Response length does not match the number of rows of `A`.
    #[error("Response length mismatch: expected {expected}, found {found}")]
    ResponseLengthMismatch { expected: usize, found: usize },

    // ---- Values ----
    /// Design matrix entry is NaN/±inf.
    #[error("Design matrix entry ({row}, {col}) is not finite: {value}")]
    NonFiniteDesign { row: usize, col: usize, value: f64 },

    /// Response entry is NaN/±inf.
    #[error("Response entry {index} is not finite: {value}")]
    NonFiniteResponse { index: usize, value: f64 },

    /// Regularization weight must be finite and non-negative.
    #[error("Invalid regularization weight lambda = {value}: {reason}")]
    InvalidLambda { value: f64, reason: &'static str },

    /// Relaxation scalar must be finite and strictly positive.
    #[error("Invalid relaxation parameter alpha = {value}: {reason}")]
    InvalidRelaxation { value: f64, reason: &'static str },
}

/// Numerical failures while evaluating the objective or gradient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Evaluation point length does not match the number of coefficients.
    #[error("Point length mismatch: expected {expected}, found {found}")]
    PointLengthMismatch { expected: usize, found: usize },

    /// The subgradient `x_g / ‖x_g‖` is undefined because the group slice is
    /// (numerically) zero.
    #[error("Group {group} has norm {norm:e} at or below the zero threshold; subgradient undefined")]
    ZeroGroupNorm { group: usize, norm: f64 },

    /// A gradient coordinate came out NaN/±inf.
    #[error("Gradient entry {index} is not finite: {value}")]
    NonFiniteGradient { index: usize, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` messages embed the payload of each variant.
    //
    // They intentionally DO NOT cover:
    // - Where the errors are raised; see `partition`, `problem`, and `model`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check that the partition-sum message names both sides of the mismatch.
    //
    // Given
    // -----
    // - `ProblemError::PartitionSumMismatch { sum: 3, n: 4 }`.
    //
    // Expect
    // ------
    // - The rendered message contains "3" and "4".
    fn partition_sum_mismatch_display_embeds_payload() {
        // Arrange
        let err = ProblemError::PartitionSumMismatch { sum: 3, n: 4 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("sum to 3"), "unexpected message: {msg}");
        assert!(msg.contains("4 columns"), "unexpected message: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Check that the zero-group message reports the offending group index.
    //
    // Given
    // -----
    // - `ModelError::ZeroGroupNorm { group: 2, norm: 0.0 }`.
    //
    // Expect
    // ------
    // - The message starts with "Group 2".
    fn zero_group_norm_display_names_group() {
        let err = ModelError::ZeroGroupNorm { group: 2, norm: 0.0 };
        assert!(err.to_string().starts_with("Group 2"));
    }
}
