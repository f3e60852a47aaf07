//! cg_solver::run — the nonlinear CG iteration loop.
//!
//! Purpose
//! -------
//! Drive one solve from the fixed starting point `x = 0.1·1` to a terminal
//! [`SolveStatus`], recording the objective and gradient-norm traces.
//!
//! Key behaviors
//! -------------
//! - Each iteration: convergence test, iteration-cap test, direction from
//!   [`RestartState::plan`], descent check `dx·c < 0`, commit, bounded line
//!   search, step, gradient refresh, history push.
//! - Numerical breakdowns end the run with a status (1, 3, 4); they are
//!   never surfaced as `Err`.
//! - With cubic options set, a breakdown (or a line-search step that fails
//!   to decrease `F`) is first retried as a cubic-regularization step along
//!   `−c`; a successful retry counts as an iteration and forces a restart.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x` and `c` always hold a point and its (defined) gradient. When the
//!   gradient at a new point is undefined the run stops at the previous
//!   point with status 3.
//! - `objective_trace.len() == grad_norm_trace.len() == iterations`.
//! - On `NonDescent`, `x` is the iterate at which the direction failed.
use std::time::Instant;

use argmin_math::ArgminL2Norm;
use ndarray::Array1;

use crate::{
    group_lasso::{ProblemInstance, model},
    optimization::{
        cg_solver::{
            cubic::{CubicStep, try_cubic_step},
            line_search::{LineSearchOutcome, StepObjective, run_line_search},
            observer::{IterationObserver, IterationRecord},
            restart::{DirectionInputs, RestartStage, RestartState},
            traits::{CgOptions, RunHistory, SolveOutcome, SolveStatus},
            types::{Grad, HISTORY_PREALLOC, INITIAL_COORDINATE, Point},
        },
        errors::OptResult,
    },
};

/// Run the CG solver on `problem`, reporting iterations to `observer`.
///
/// # Errors
/// [`OptError`](crate::optimization::errors::OptError) only for invalid
/// options; every numerical outcome is a [`SolveStatus`].
pub fn run_cg(
    problem: &ProblemInstance, opts: &CgOptions, label: &str,
    observer: &mut dyn IterationObserver,
) -> OptResult<SolveOutcome> {
    opts.validate()?;
    let started = Instant::now();
    let mut run = match CgRun::start(problem, opts) {
        Ok(run) => run,
        Err(status) => {
            log::warn!("{label}: gradient undefined at the starting point ({status})");
            let x = initial_point(problem.n_features());
            return Ok(SolveOutcome {
                x,
                history: RunHistory {
                    objective_trace: Vec::new(),
                    grad_norm_trace: Vec::new(),
                    elapsed_secs: started.elapsed().as_secs_f64(),
                    iterations: 0,
                    status,
                    powell_restart_triggered: false,
                    cubic_invoked: false,
                    cubic_steps: 0,
                },
            });
        }
    };

    let status = loop {
        if let Some(status) = run.iterate(observer) {
            break status;
        }
    };
    if !status.is_success() {
        log::warn!("{label}: stopped after {} iterations: {status}", run.iterations);
    }
    Ok(run.finish(status, started))
}

/// Starting point `0.1·1ₙ`.
pub fn initial_point(n: usize) -> Point {
    Array1::from_elem(n, INITIAL_COORDINATE)
}

/// Mutable state of one solve.
pub(crate) struct CgRun<'a> {
    problem: &'a ProblemInstance,
    opts: &'a CgOptions,
    x: Point,
    c: Grad,
    c0: Grad,
    f_x: f64,
    dx_prev: Grad,
    step_prev: f64,
    restart: RestartState,
    sqrt_n: f64,
    iterations: usize,
    cubic_steps: usize,
    objective_trace: Vec<f64>,
    grad_norm_trace: Vec<f64>,
}

impl<'a> CgRun<'a> {
    /// Evaluate the starting point.
    ///
    /// # Errors
    /// `SolveStatus::DirectionUndefined` if the gradient is undefined there.
    pub(crate) fn start(problem: &'a ProblemInstance, opts: &'a CgOptions) -> Result<Self, SolveStatus> {
        let n = problem.n_features();
        let x = initial_point(n);
        let c = model::gradient(problem, x.view(), opts.group_norm_eps)
            .map_err(|_| SolveStatus::DirectionUndefined)?;
        let f_x = full_objective(problem, &x);
        let capacity = opts.max_iter.min(HISTORY_PREALLOC);
        Ok(Self {
            problem,
            opts,
            c0: c.clone(),
            dx_prev: Array1::zeros(n),
            step_prev: 0.0,
            restart: RestartState::new(n),
            sqrt_n: (n as f64).sqrt(),
            iterations: 0,
            cubic_steps: 0,
            objective_trace: Vec::with_capacity(capacity),
            grad_norm_trace: Vec::with_capacity(capacity),
            x,
            c,
            f_x,
        })
    }

    fn converged(&self) -> bool {
        self.c.l2_norm() <= self.sqrt_n * self.opts.abs_tol + self.opts.rel_tol * self.x.l2_norm()
    }

    /// Perform one iteration. Returns `Some(status)` when the run is over.
    pub(crate) fn iterate(&mut self, observer: &mut dyn IterationObserver) -> Option<SolveStatus> {
        if self.converged() {
            return Some(SolveStatus::Converged);
        }
        if self.iterations >= self.opts.max_iter {
            return Some(SolveStatus::IterLimit);
        }
        match self.cg_step(observer) {
            Ok(()) => None,
            Err(status) => self.recover(status, observer),
        }
    }

    fn cg_step(&mut self, observer: &mut dyn IterationObserver) -> Result<(), SolveStatus> {
        let s = &self.dx_prev * self.step_prev;
        let planned = self
            .restart
            .plan(
                DirectionInputs { c: self.c.view(), c0: self.c0.view(), s: s.view() },
                self.opts.powell_threshold,
                self.opts.secant_eps,
            )
            .map_err(|_| SolveStatus::DirectionUndefined)?;
        if !(planned.dx.dot(&self.c) < 0.0) {
            return Err(SolveStatus::NonDescent);
        }
        let stage = planned.stage;
        let dx = planned.dx.clone();
        self.restart.commit(planned);
        self.c0.assign(&self.c);

        let phi = StepObjective::new(
            self.problem,
            self.x.view(),
            dx.view(),
            self.opts.penalty_model,
            self.opts.group_norm_eps,
        )
        .map_err(|_| SolveStatus::DirectionUndefined)?;
        let step = match run_line_search(phi, &self.opts.line_search) {
            LineSearchOutcome::Accepted { step, .. } => step,
            LineSearchOutcome::Failed { reason } => {
                log::debug!("line search failed at iteration {}: {reason}", self.iterations + 1);
                return Err(SolveStatus::LineSearchFailed);
            }
        };

        let mut x_new = self.x.clone();
        x_new.scaled_add(step, &dx);
        let f_new = full_objective(self.problem, &x_new);
        if !(f_new < self.f_x) {
            if let Some(cubic) = self.cubic_step() {
                self.apply_cubic(cubic, observer);
                return Ok(());
            }
        }
        let c_new = model::gradient(self.problem, x_new.view(), self.opts.group_norm_eps)
            .map_err(|_| SolveStatus::DirectionUndefined)?;

        self.x = x_new;
        self.c = c_new;
        self.f_x = f_new;
        self.dx_prev = dx;
        self.step_prev = step;
        self.record(step, stage, false, observer);
        Ok(())
    }

    fn cubic_step(&self) -> Option<CubicStep> {
        let cubic = self.opts.cubic.as_ref()?;
        try_cubic_step(
            self.problem,
            self.x.view(),
            self.c.view(),
            self.f_x,
            cubic,
            self.opts.group_norm_eps,
        )
    }

    fn recover(
        &mut self, status: SolveStatus, observer: &mut dyn IterationObserver,
    ) -> Option<SolveStatus> {
        match self.cubic_step() {
            Some(cubic) => {
                log::debug!("cubic step recovered from {status} at iteration {}", self.iterations + 1);
                self.apply_cubic(cubic, observer);
                None
            }
            None => Some(status),
        }
    }

    fn apply_cubic(&mut self, cubic: CubicStep, observer: &mut dyn IterationObserver) {
        self.dx_prev = self.c.mapv(|v| -v);
        self.step_prev = cubic.step;
        self.c0 = std::mem::replace(&mut self.c, cubic.grad);
        self.x = cubic.x;
        self.f_x = cubic.objective;
        self.restart.force_restart();
        self.cubic_steps += 1;
        self.record(cubic.step, RestartStage::SteepestDescent, true, observer);
    }

    fn record(
        &mut self, step: f64, stage: RestartStage, cubic: bool, observer: &mut dyn IterationObserver,
    ) {
        let grad_norm = self.c.l2_norm();
        self.iterations += 1;
        self.objective_trace.push(self.f_x);
        self.grad_norm_trace.push(grad_norm);
        observer.observe(&IterationRecord {
            iteration: self.iterations,
            objective: self.f_x,
            grad_norm,
            step,
            stage,
            cubic,
        });
    }

    fn finish(self, status: SolveStatus, started: Instant) -> SolveOutcome {
        SolveOutcome {
            x: self.x,
            history: RunHistory {
                objective_trace: self.objective_trace,
                grad_norm_trace: self.grad_norm_trace,
                elapsed_secs: started.elapsed().as_secs_f64(),
                iterations: self.iterations,
                status,
                powell_restart_triggered: self.restart.powell_triggered(),
                cubic_invoked: self.cubic_steps > 0,
                cubic_steps: self.cubic_steps,
            },
        }
    }
}

fn full_objective(problem: &ProblemInstance, x: &Point) -> f64 {
    model::smooth_value(problem, x.view()) + model::penalty_value(problem, x.view())
}
