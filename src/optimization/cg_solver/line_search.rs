//! cg_solver::line_search — one-dimensional step selection along `dx`.
//!
//! Purpose
//! -------
//! Minimize `φ(a)` over the configured interval with argmin's Brent solver,
//! where `φ` is the group-LASSO objective restricted to the ray
//! `x₀ + a·dx` under a chosen [`PenaltyModel`].
//!
//! Key behaviors
//! -------------
//! - [`StepObjective`] precomputes `r₀ = A·x₀ − b` and `A·dx`, so each
//!   trial costs `O(m)`: `½‖r₀ + a·A·dx‖² + P(x₀) [+ a·⟨∂P(x₀), dx⟩]`.
//! - [`run_line_search`] never returns an error: argmin failures, exhausted
//!   budgets, and non-finite results all map to
//!   [`LineSearchOutcome::Failed`], which the runner reports as status 4.
//!
//! Invariants & assumptions
//! ------------------------
//! - The penalty is anchored at `x₀` for every trial `a`.
//! - `φ` is evaluated only at finite `a`; a non-finite value is an error
//!   raised from the cost function.
use argmin::core::{
    CostFunction, Error, Executor, State, TerminationReason, TerminationStatus,
};
use ndarray::{Array1, ArrayView1};

use crate::{
    group_lasso::{ProblemInstance, errors::ModelResult, model},
    optimization::{
        cg_solver::{
            builders::build_brent,
            traits::{LineSearchOptions, PenaltyModel},
            types::{LineSearchState, Step},
        },
        errors::OptError,
    },
};

/// Restriction of the objective to the ray `x₀ + a·dx`.
#[derive(Debug, Clone)]
pub struct StepObjective {
    r0: Array1<f64>,
    a_dx: Array1<f64>,
    penalty0: f64,
    slope: f64,
}

impl StepObjective {
    /// Prepare `φ` for the ray from `x0` along `dx`.
    ///
    /// # Errors
    /// With [`PenaltyModel::Linearized`], propagates the zero-group policy of
    /// [`model::penalty_slope`].
    pub fn new(
        problem: &ProblemInstance, x0: ArrayView1<'_, f64>, dx: ArrayView1<'_, f64>,
        penalty_model: PenaltyModel, group_norm_eps: f64,
    ) -> ModelResult<Self> {
        let slope = match penalty_model {
            PenaltyModel::Frozen => 0.0,
            PenaltyModel::Linearized => model::penalty_slope(problem, x0, dx, group_norm_eps)?,
        };
        Ok(Self {
            r0: model::residual(problem, x0),
            a_dx: problem.a().dot(&dx),
            penalty0: model::penalty_value(problem, x0),
            slope,
        })
    }

    /// `φ(a)` without argmin's error wrapping.
    pub fn value(&self, a: Step) -> f64 {
        let smooth: f64 = self.r0.iter().zip(self.a_dx.iter()).map(|(r, d)| (r + a * d).powi(2)).sum();
        0.5 * smooth + self.penalty0 + a * self.slope
    }
}

impl CostFunction for StepObjective {
    type Param = Step;
    type Output = f64;

    fn cost(&self, a: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.value(*a);
        if !value.is_finite() {
            return Err(OptError::BackendError {
                text: format!("line-search objective is non-finite at step {a}"),
            }
            .into());
        }
        Ok(value)
    }
}

/// Result of one bounded line search.
#[derive(Debug, Clone, PartialEq)]
pub enum LineSearchOutcome {
    Accepted { step: Step, value: f64 },
    Failed { reason: String },
}

/// Minimize `φ` over `[opts.lower, opts.upper]` with Brent's method.
pub fn run_line_search(objective: StepObjective, opts: &LineSearchOptions) -> LineSearchOutcome {
    let solver = build_brent(opts);
    let max_iters = opts.max_iter as u64;
    let result = Executor::new(objective, solver).configure(|state| state.max_iters(max_iters)).run();
    match result {
        Ok(res) => classify(res.state()),
        Err(err) => LineSearchOutcome::Failed { reason: OptError::from(err).to_string() },
    }
}

fn classify(state: &LineSearchState) -> LineSearchOutcome {
    if let TerminationStatus::Terminated(TerminationReason::MaxItersReached) =
        state.get_termination_status()
    {
        return LineSearchOutcome::Failed { reason: "line-search iteration budget exhausted".into() };
    }
    match state.get_best_param() {
        Some(&step) if step.is_finite() && state.get_best_cost().is_finite() => {
            LineSearchOutcome::Accepted { step, value: state.get_best_cost() }
        }
        _ => LineSearchOutcome::Failed { reason: "no finite step found".into() },
    }
}
