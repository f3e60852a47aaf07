use argmin::core::{ArgminError, Error};
use thiserror::Error;

use crate::group_lasso::errors::{ModelError, ProblemError};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

/// Errors raised by the optimization layer.
///
/// These are *hard* errors: invalid configuration, inconsistent inputs, or
/// backend failures. Numerical breakdowns inside a solve (non-descent
/// direction, degenerate secants, failed line search) are not errors; they
/// end the run with a terminal `SolveStatus`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptError {
    // ---- CgOptions ----
    /// Tolerances need to be finite and non-negative, and not both zero.
    #[error("Invalid tolerance {name} = {tol}: {reason}")]
    InvalidTolerance { name: &'static str, tol: f64, reason: &'static str },

    /// Maximum iterations needs to be positive.
    #[error("Invalid maximum iterations {max_iter}: {reason}")]
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// Line-search interval must be finite with `0 <= lower < upper`.
    #[error("Invalid line-search bounds [{lower}, {upper}]: {reason}")]
    InvalidLineSearchBounds { lower: f64, upper: f64, reason: &'static str },

    /// Powell restart threshold must lie in (0, 1).
    #[error("Invalid Powell restart threshold {value}: {reason}")]
    InvalidPowellThreshold { value: f64, reason: &'static str },

    /// Safeguard thresholds need to be finite and non-negative.
    #[error("Invalid safeguard {name} = {value}: {reason}")]
    InvalidSafeguard { name: &'static str, value: f64, reason: &'static str },

    /// Cubic-regularization settings are out of range.
    #[error("Invalid cubic-regularization setting {name} = {value}: {reason}")]
    InvalidCubic { name: &'static str, value: f64, reason: &'static str },

    // ---- Problem / model ----
    /// Problem construction or validation failed.
    #[error(transparent)]
    Problem(#[from] ProblemError),

    /// Objective or gradient evaluation failed outside the iteration loop.
    #[error(transparent)]
    Model(#[from] ModelError),

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    #[error("Invalid parameter: {text}")]
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    #[error("Not implemented: {text}")]
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    #[error("Not initialized: {text}")]
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    #[error("Condition violated: {text}")]
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckpointNotFound
    #[error("Checkpoint not found: {text}")]
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    #[error("Potential bug: {text}")]
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    #[error("Impossible error: {text}")]
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    #[error("Backend error: {text}")]
    BackendError { text: String },

    // ---- Fallback ----
    #[error("Unknown error")]
    UnknownError,
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        let original_err = match original_err.downcast::<ModelError>() {
            Ok(model_err) => return OptError::Model(model_err),
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Conversions from argmin's `Error` back into `OptError`, including
    //   errors that originated in this crate and were boxed by argmin.
    // - Transparent wrapping of problem/model errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // An `OptError` that travelled through argmin comes back unchanged.
    //
    // Given
    // -----
    // - `OptError::InvalidMaxIter` converted into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `OptError::from` returns the same variant and payload.
    fn opt_error_round_trips_through_argmin() {
        // Arrange
        let original = OptError::InvalidMaxIter { max_iter: 0, reason: "must be positive" };
        let boxed: Error = original.clone().into();

        // Act
        let back = OptError::from(boxed);

        // Assert
        assert_eq!(back, original);
    }

    #[test]
    // Purpose
    // -------
    // Model errors raised inside an argmin cost function map to
    // `OptError::Model`.
    //
    // Given
    // -----
    // - `ModelError::ZeroGroupNorm` boxed as an argmin error.
    //
    // Expect
    // ------
    // - `OptError::Model(ZeroGroupNorm { .. })`.
    fn model_error_is_recovered_from_argmin() {
        let boxed: Error = ModelError::ZeroGroupNorm { group: 1, norm: 0.0 }.into();
        assert_eq!(
            OptError::from(boxed),
            OptError::Model(ModelError::ZeroGroupNorm { group: 1, norm: 0.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Native argmin errors map onto their wrapper variants.
    //
    // Given
    // -----
    // - `ArgminError::InvalidParameter` with some text.
    //
    // Expect
    // ------
    // - `OptError::InvalidParameter` with the same text.
    fn argmin_invalid_parameter_maps_to_wrapper() {
        let boxed: Error = ArgminError::InvalidParameter { text: "bad bounds".into() }.into();
        assert_eq!(OptError::from(boxed), OptError::InvalidParameter { text: "bad bounds".into() });
    }

    #[test]
    // Purpose
    // -------
    // Problem errors are displayed transparently.
    //
    // Given
    // -----
    // - `ProblemError::EmptyPartition` wrapped via `From`.
    //
    // Expect
    // ------
    // - Identical `Display` output.
    fn problem_error_is_transparent() {
        let inner = ProblemError::EmptyPartition;
        let outer: OptError = inner.clone().into();
        assert_eq!(outer.to_string(), inner.to_string());
    }
}
