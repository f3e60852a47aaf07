//! Validation helpers for CG solver configuration.
//!
//! This module centralizes the consistency checks behind the option
//! constructors in [`traits`](super::traits):
//!
//! - **Tolerances**: [`verify_tolerances`] ensures the convergence
//!   tolerances are finite, non-negative, and not both zero.
//! - **Iteration caps**: [`verify_max_iter`] rejects zero.
//! - **Line-search interval**: [`verify_bounds`] enforces
//!   `0 ≤ lower < upper < ∞`.
//! - **Safeguards**: [`verify_safeguard`] and [`verify_powell_threshold`]
//!   keep the restart and epsilon thresholds in range.
//!
//! All helpers return domain-specific [`OptError`] variants so option
//! constructors can simply chain them with `?`.
use crate::optimization::errors::{OptError, OptResult};

/// Validate the absolute/relative convergence tolerances.
///
/// # Errors
/// [`OptError::InvalidTolerance`] if either value is non-finite or
/// negative, or if both are zero (the test `‖c‖ ≤ 0` would never fire).
pub fn verify_tolerances(abs_tol: f64, rel_tol: f64) -> OptResult<()> {
    for (name, tol) in [("abs_tol", abs_tol), ("rel_tol", rel_tol)] {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolerance { name, tol, reason: "Tolerance must be finite." });
        }
        if tol < 0.0 {
            return Err(OptError::InvalidTolerance {
                name,
                tol,
                reason: "Tolerance must be non-negative.",
            });
        }
    }
    if abs_tol == 0.0 && rel_tol == 0.0 {
        return Err(OptError::InvalidTolerance {
            name: "abs_tol",
            tol: abs_tol,
            reason: "At least one of abs_tol and rel_tol must be positive.",
        });
    }
    Ok(())
}

/// Validate an iteration cap.
///
/// # Errors
/// [`OptError::InvalidMaxIter`] if `max_iter == 0`.
pub fn verify_max_iter(max_iter: usize) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate a step-length interval `[lower, upper]`.
///
/// # Errors
/// [`OptError::InvalidLineSearchBounds`] unless both ends are finite and
/// `0 ≤ lower < upper`.
pub fn verify_bounds(lower: f64, upper: f64) -> OptResult<()> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(OptError::InvalidLineSearchBounds {
            lower,
            upper,
            reason: "Bounds must be finite.",
        });
    }
    if lower < 0.0 {
        return Err(OptError::InvalidLineSearchBounds {
            lower,
            upper,
            reason: "Step lengths must be non-negative.",
        });
    }
    if lower >= upper {
        return Err(OptError::InvalidLineSearchBounds {
            lower,
            upper,
            reason: "Lower bound must be strictly below the upper bound.",
        });
    }
    Ok(())
}

/// Validate the Powell restart threshold.
///
/// # Errors
/// [`OptError::InvalidPowellThreshold`] unless `0 < value < 1`.
pub fn verify_powell_threshold(value: f64) -> OptResult<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(OptError::InvalidPowellThreshold {
            value,
            reason: "Threshold must lie strictly between 0 and 1.",
        });
    }
    Ok(())
}

/// Validate a non-negative safeguard threshold.
///
/// # Errors
/// [`OptError::InvalidSafeguard`] if the value is non-finite or negative.
pub fn verify_safeguard(name: &'static str, value: f64) -> OptResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(OptError::InvalidSafeguard {
            name,
            value,
            reason: "Safeguard must be finite and non-negative.",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every rejection branch of the validators above and
    // the accepted defaults.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults pass; non-finite, negative, and all-zero tolerances fail.
    //
    // Given
    // -----
    // - `(1e-4, 1e-2)`, `(NaN, 1e-2)`, `(1e-4, -1.0)`, `(0, 0)`.
    //
    // Expect
    // ------
    // - `Ok` for the first, `InvalidTolerance` for the others.
    fn tolerances_validate() {
        assert!(verify_tolerances(1e-4, 1e-2).is_ok());
        assert!(verify_tolerances(0.0, 1e-2).is_ok());
        assert!(matches!(
            verify_tolerances(f64::NAN, 1e-2),
            Err(OptError::InvalidTolerance { name: "abs_tol", .. })
        ));
        assert!(matches!(
            verify_tolerances(1e-4, -1.0),
            Err(OptError::InvalidTolerance { name: "rel_tol", .. })
        ));
        assert!(verify_tolerances(0.0, 0.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Interval checks reject inverted, negative, and infinite bounds.
    //
    // Given
    // -----
    // - `[0, 10]`, `[5, 5]`, `[-1, 1]`, `[0, ∞]`.
    //
    // Expect
    // ------
    // - Only `[0, 10]` is accepted.
    fn bounds_validate() {
        assert!(verify_bounds(0.0, 10.0).is_ok());
        assert!(verify_bounds(5.0, 5.0).is_err());
        assert!(verify_bounds(-1.0, 1.0).is_err());
        assert!(verify_bounds(0.0, f64::INFINITY).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Scalar safeguards and caps reject out-of-range values.
    //
    // Given
    // -----
    // - Powell thresholds 0.2, 0, 1; safeguards 0, −1e-3; caps 1, 0.
    //
    // Expect
    // ------
    // - Accept 0.2, safeguard 0, cap 1; reject the rest.
    fn scalar_safeguards_validate() {
        assert!(verify_powell_threshold(0.2).is_ok());
        assert!(verify_powell_threshold(0.0).is_err());
        assert!(verify_powell_threshold(1.0).is_err());
        assert!(verify_safeguard("secant_eps", 0.0).is_ok());
        assert!(verify_safeguard("secant_eps", -1e-3).is_err());
        assert!(verify_max_iter(1).is_ok());
        assert!(verify_max_iter(0).is_err());
    }
}
