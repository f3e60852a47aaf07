//! group_lasso::model — objective and gradient of the group-LASSO cost.
//!
//! Purpose
//! -------
//! Evaluate the two ingredients every solver needs:
//!
//! ```text
//!     F(x) = ½‖A·x − b‖² + λ·Σ_g ‖x_g‖₂
//!     ∇F(x) = Aᵗ(A·x − b) + λ·[x_g / ‖x_g‖₂]_g
//! ```
//!
//! with the penalty's subgradient taken at a nonzero point.
//!
//! Key behaviors
//! -------------
//! - [`objective`] takes its smooth-term point and its penalty point as two
//!   separately named fields of [`EvalPoints`]. Reporting uses the same point
//!   for both; a line search anchors the penalty at the pre-step iterate.
//! - [`gradient`] maps an exactly (or numerically) zero group slice to
//!   [`ModelError::ZeroGroupNorm`] instead of dividing by zero.
//! - [`penalty_slope`] returns `⟨∂P(x), d⟩`, the directional derivative of
//!   the penalty at a nonzero point, used by linearized line-search models.
//! - [`gradient_check`] compares [`gradient`] with a central
//!   finite-difference gradient of [`objective`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs come from a validated `ProblemInstance`; only evaluation points
//!   are checked here (length and, for the gradient, finiteness).
//! - With `λ = 0` no group norm is divided by, so zero slices are harmless.
//!
//! Conventions
//! -----------
//! - Vectors are `ndarray` views/arrays over `f64`.
//! - `group_norm_eps` is an absolute threshold on `‖x_g‖₂`.
use finitediff::FiniteDiff;
use ndarray::{Array1, ArrayView1, s};

use crate::group_lasso::{
    errors::{ModelError, ModelResult},
    problem::ProblemInstance,
};

/// Evaluation points for [`objective`].
///
/// - `residual_at`: point at which the smooth term `½‖A·x − b‖²` is taken.
/// - `penalty_at`: point at which the group-norm penalty is taken.
#[derive(Debug, Clone, Copy)]
pub struct EvalPoints<'a> {
    pub residual_at: ArrayView1<'a, f64>,
    pub penalty_at: ArrayView1<'a, f64>,
}

impl<'a> EvalPoints<'a> {
    /// Both terms evaluated at the same point (full objective).
    pub fn at(x: ArrayView1<'a, f64>) -> Self {
        Self { residual_at: x, penalty_at: x }
    }
}

/// Residual `A·x − b`.
pub fn residual(problem: &ProblemInstance, x: ArrayView1<'_, f64>) -> Array1<f64> {
    problem.a().dot(&x) - &problem.b()
}

/// Smooth term `½‖A·x − b‖²`.
pub fn smooth_value(problem: &ProblemInstance, x: ArrayView1<'_, f64>) -> f64 {
    let r = residual(problem, x);
    0.5 * r.dot(&r)
}

/// Penalty `λ·Σ_g ‖x_g‖₂`.
pub fn penalty_value(problem: &ProblemInstance, x: ArrayView1<'_, f64>) -> f64 {
    if problem.lambda() == 0.0 {
        return 0.0;
    }
    let total: f64 = problem
        .partition()
        .ranges()
        .map(|range| {
            let xg = x.slice(s![range]);
            xg.dot(&xg).sqrt()
        })
        .sum();
    problem.lambda() * total
}

/// Group-LASSO objective with independently chosen evaluation points.
///
/// Computes `½‖A·residual_at − b‖² + λ·Σ_g ‖penalty_at_g‖₂`.
///
/// # Errors
/// [`ModelError::PointLengthMismatch`] if either point does not have
/// length `n`.
pub fn objective(problem: &ProblemInstance, points: EvalPoints<'_>) -> ModelResult<f64> {
    check_len(problem, points.residual_at)?;
    check_len(problem, points.penalty_at)?;
    Ok(smooth_value(problem, points.residual_at) + penalty_value(problem, points.penalty_at))
}

/// Gradient of the smooth term plus the group-norm subgradient.
///
/// # Errors
/// - [`ModelError::PointLengthMismatch`] on a wrong-length `x`.
/// - [`ModelError::ZeroGroupNorm`] when `λ > 0` and some `‖x_g‖₂ ≤
///   group_norm_eps`.
/// - [`ModelError::NonFiniteGradient`] for the first NaN/±inf coordinate.
pub fn gradient(
    problem: &ProblemInstance, x: ArrayView1<'_, f64>, group_norm_eps: f64,
) -> ModelResult<Array1<f64>> {
    check_len(problem, x)?;
    let r = residual(problem, x);
    let mut grad = problem.a().t().dot(&r);
    let lambda = problem.lambda();
    if lambda > 0.0 {
        for (group, range) in problem.partition().ranges().enumerate() {
            let xg = x.slice(s![range.clone()]);
            let norm = xg.dot(&xg).sqrt();
            if norm <= group_norm_eps {
                return Err(ModelError::ZeroGroupNorm { group, norm });
            }
            grad.slice_mut(s![range]).scaled_add(lambda / norm, &xg);
        }
    }
    if let Some((index, &value)) = grad.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ModelError::NonFiniteGradient { index, value });
    }
    Ok(grad)
}

/// Directional derivative of the penalty at `x` along `direction`:
/// `λ·Σ_g ⟨x_g, d_g⟩ / ‖x_g‖₂`.
///
/// # Errors
/// Same zero-group policy as [`gradient`].
pub fn penalty_slope(
    problem: &ProblemInstance, x: ArrayView1<'_, f64>, direction: ArrayView1<'_, f64>,
    group_norm_eps: f64,
) -> ModelResult<f64> {
    check_len(problem, x)?;
    check_len(problem, direction)?;
    let lambda = problem.lambda();
    if lambda == 0.0 {
        return Ok(0.0);
    }
    let mut slope = 0.0;
    for (group, range) in problem.partition().ranges().enumerate() {
        let xg = x.slice(s![range.clone()]);
        let norm = xg.dot(&xg).sqrt();
        if norm <= group_norm_eps {
            return Err(ModelError::ZeroGroupNorm { group, norm });
        }
        slope += xg.dot(&direction.slice(s![range])) / norm;
    }
    Ok(lambda * slope)
}

/// Largest absolute deviation between [`gradient`] and a central
/// finite-difference gradient of the full objective at `x`.
///
/// Meaningful only away from zero group slices, where the objective is
/// differentiable.
///
/// # Errors
/// Propagates the analytic gradient's errors.
pub fn gradient_check(
    problem: &ProblemInstance, x: ArrayView1<'_, f64>, group_norm_eps: f64,
) -> ModelResult<f64> {
    let analytic = gradient(problem, x, group_norm_eps)?;
    let cost = |p: &Array1<f64>| -> f64 {
        objective(problem, EvalPoints::at(p.view())).unwrap_or(f64::NAN)
    };
    let numeric = x.to_owned().central_diff(&cost);
    Ok(analytic.iter().zip(numeric.iter()).map(|(a, n)| (a - n).abs()).fold(0.0, f64::max))
}

fn check_len(problem: &ProblemInstance, x: ArrayView1<'_, f64>) -> ModelResult<()> {
    let expected = problem.n_features();
    if x.len() != expected {
        return Err(ModelError::PointLengthMismatch { expected, found: x.len() });
    }
    Ok(())
}
