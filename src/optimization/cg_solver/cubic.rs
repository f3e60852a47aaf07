//! cg_solver::cubic — cubic-regularization recovery step.
//!
//! Along `−c` the objective's smooth part is an exact quadratic, so the
//! cubic model
//!
//! ```text
//!     m(t) = F(x) − t‖c‖² + ½t²‖A·c‖² + (σ/3)·t³‖c‖³
//! ```
//!
//! has the closed-form minimizer
//! `t = (−q + √(q² + 4σ‖c‖⁵)) / (2σ‖c‖³)` with `q = ‖A·c‖²`. A trial is
//! accepted when the full objective strictly decreases and the gradient at
//! the trial point is defined; otherwise `σ` grows and the step shrinks.
use ndarray::ArrayView1;

use crate::{
    group_lasso::{ProblemInstance, model},
    optimization::cg_solver::{
        traits::CubicOptions,
        types::{Grad, Point},
    },
};

/// An accepted cubic step.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicStep {
    pub x: Point,
    pub grad: Grad,
    pub step: f64,
    pub objective: f64,
}

/// Minimizer of the cubic model along `−c` for weight `sigma`.
pub fn cubic_step_length(grad_norm: f64, q: f64, sigma: f64) -> f64 {
    let g3 = grad_norm.powi(3);
    (-q + (q * q + 4.0 * sigma * g3 * grad_norm * grad_norm).sqrt()) / (2.0 * sigma * g3)
}

/// Try up to `opts.max_tries` cubic steps from `x` along `−c`.
///
/// Returns `None` when `‖c‖ = 0` or every trial fails to decrease `F`.
pub fn try_cubic_step(
    problem: &ProblemInstance, x: ArrayView1<'_, f64>, c: ArrayView1<'_, f64>, f_x: f64,
    opts: &CubicOptions, group_norm_eps: f64,
) -> Option<CubicStep> {
    let grad_norm = c.dot(&c).sqrt();
    if !(grad_norm > 0.0) || !grad_norm.is_finite() {
        return None;
    }
    let a_c = problem.a().dot(&c);
    let q = a_c.dot(&a_c);
    let mut sigma = opts.sigma0;
    for _ in 0..opts.max_tries {
        let step = cubic_step_length(grad_norm, q, sigma);
        if step.is_finite() && step > 0.0 {
            let mut trial = x.to_owned();
            trial.scaled_add(-step, &c);
            let f_trial = model::smooth_value(problem, trial.view())
                + model::penalty_value(problem, trial.view());
            if f_trial.is_finite() && f_trial < f_x {
                if let Ok(grad) = model::gradient(problem, trial.view(), group_norm_eps) {
                    return Some(CubicStep { x: trial, grad, step, objective: f_trial });
                }
            }
        }
        sigma *= opts.growth;
    }
    None
}
