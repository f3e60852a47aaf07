//! ProblemInstance — validated, immutable group-LASSO input.
//!
//! Purpose
//! -------
//! Bundle the data of one group-LASSO regression problem
//!
//! ```text
//!     minimize_x  ½‖A·x − b‖² + λ·Σ_g ‖x_g‖₂
//! ```
//!
//! together with the solver-facing relaxation scalar `α`, and guarantee that
//! every structural invariant holds before any solver touches it.
//!
//! Key behaviors
//! -------------
//! - [`ProblemInstance::new`] validates shapes, finiteness, `λ ≥ 0`, `α > 0`
//!   and the partition sum, failing with [`ProblemError`] up front.
//! - Accessors expose read-only views; a solve never mutates `A` or `b`.
//! - Deserialization is routed through [`ProblemInstance::new`], so data
//!   loaded from JSON meets the same invariants as data built in code.
//!
//! Invariants & assumptions
//! ------------------------
//! - `A` is `m × n` with `m, n > 0`; `b.len() == m`.
//! - `partition.total() == n`.
//! - All entries of `A` and `b` are finite.
//!
//! Conventions
//! -----------
//! - `α` is the over-relaxation scalar shared by every solver variant behind
//!   the `LassoSolver` interface. Relaxed splitting methods consume it; the
//!   CG solver carries it through unchanged (its step lengths come from the
//!   line search).
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::group_lasso::{
    errors::{ProblemError, ProblemResult},
    partition::Partition,
};

/// One group-LASSO problem instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProblemRepr")]
pub struct ProblemInstance {
    a: Array2<f64>,
    b: Array1<f64>,
    lambda: f64,
    partition: Partition,
    relaxation: f64,
}

/// Unvalidated wire form of a [`ProblemInstance`].
#[derive(Deserialize)]
struct ProblemRepr {
    a: Array2<f64>,
    b: Array1<f64>,
    lambda: f64,
    partition: Partition,
    relaxation: f64,
}

impl TryFrom<ProblemRepr> for ProblemInstance {
    type Error = ProblemError;

    fn try_from(repr: ProblemRepr) -> ProblemResult<Self> {
        Self::new(repr.a, repr.b, repr.lambda, repr.partition, repr.relaxation)
    }
}

impl ProblemInstance {
    /// Construct a validated problem.
    ///
    /// Parameters
    /// ----------
    /// - `a`: design matrix, `m × n`.
    /// - `b`: response vector, length `m`.
    /// - `lambda`: penalty weight, finite and `≥ 0`.
    /// - `partition`: block sizes summing to `n`.
    /// - `relaxation`: over-relaxation scalar `α`, finite and `> 0`.
    ///
    /// Errors
    /// ------
    /// - `ProblemError::EmptyDesign` / `ResponseLengthMismatch` on shapes.
    /// - `ProblemError::NonFiniteDesign` / `NonFiniteResponse` on the first
    ///   NaN/±inf entry.
    /// - `ProblemError::InvalidLambda` / `InvalidRelaxation` on scalars.
    /// - `ProblemError::PartitionSumMismatch` when the blocks do not cover `n`.
    pub fn new(
        a: Array2<f64>, b: Array1<f64>, lambda: f64, partition: Partition, relaxation: f64,
    ) -> ProblemResult<Self> {
        let (rows, cols) = a.dim();
        if rows == 0 || cols == 0 {
            return Err(ProblemError::EmptyDesign { rows, cols });
        }
        if b.len() != rows {
            return Err(ProblemError::ResponseLengthMismatch { expected: rows, found: b.len() });
        }
        if let Some(((row, col), &value)) = a.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ProblemError::NonFiniteDesign { row, col, value });
        }
        if let Some((index, &value)) = b.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ProblemError::NonFiniteResponse { index, value });
        }
        if !lambda.is_finite() {
            return Err(ProblemError::InvalidLambda { value: lambda, reason: "must be finite" });
        }
        if lambda < 0.0 {
            return Err(ProblemError::InvalidLambda {
                value: lambda,
                reason: "must be non-negative",
            });
        }
        if !relaxation.is_finite() || relaxation <= 0.0 {
            return Err(ProblemError::InvalidRelaxation {
                value: relaxation,
                reason: "must be finite and strictly positive",
            });
        }
        partition.check_len(cols)?;
        Ok(Self { a, b, lambda, partition, relaxation })
    }

    pub fn a(&self) -> ArrayView2<'_, f64> {
        self.a.view()
    }

    pub fn b(&self) -> ArrayView1<'_, f64> {
        self.b.view()
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn relaxation(&self) -> f64 {
        self.relaxation
    }

    /// Number of coefficients `n`.
    pub fn n_features(&self) -> usize {
        self.a.ncols()
    }

    /// Number of observations `m`.
    pub fn n_samples(&self) -> usize {
        self.a.nrows()
    }
}
