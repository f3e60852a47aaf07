//! High-level entry points for solving a group-LASSO problem with CG.
//!
//! [`CgSolver`] bundles a name and [`CgOptions`] and implements
//! [`LassoSolver`], which is what the benchmark harness consumes.
//! [`solve_group_lasso`] is the one-shot convenience wrapper.
use crate::{
    group_lasso::ProblemInstance,
    optimization::{
        cg_solver::{
            observer::{IterationObserver, LogObserver, NoopObserver},
            run::run_cg,
            traits::{CgOptions, LassoSolver, SolveOutcome},
        },
        errors::OptResult,
    },
};

/// Nonlinear CG solver with Beale–Powell restarts.
///
/// # Example
/// ```no_run
/// use group_lasso_cg::prelude::*;
/// use ndarray::{Array2, array};
///
/// let problem = ProblemInstance::new(
///     Array2::eye(2),
///     array![3.0, 4.0],
///     1.0,
///     Partition::singletons(2)?,
///     1.0,
/// )?;
/// let out = CgSolver::new(CgOptions::default()).solve(&problem)?;
/// println!("x = {:?}, status = {}", out.x, out.history.status);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CgSolver {
    name: String,
    opts: CgOptions,
}

impl CgSolver {
    /// Named `"cg"`, or `"cg-cubic"` when `opts.cubic` is set.
    pub fn new(opts: CgOptions) -> Self {
        let name = if opts.cubic.is_some() { "cg-cubic" } else { "cg" };
        Self { name: name.to_string(), opts }
    }

    /// Cubic-regularization variant; keeps `opts.cubic` if already set.
    pub fn cubic(opts: CgOptions) -> Self {
        let cubic = opts.cubic.unwrap_or_default();
        Self::new(opts.with_cubic(cubic))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn options(&self) -> &CgOptions {
        &self.opts
    }

    /// Solve while reporting every iteration to `observer`.
    ///
    /// # Errors
    /// Invalid options only; see [`run_cg`].
    pub fn solve_observed(
        &self, problem: &ProblemInstance, observer: &mut dyn IterationObserver,
    ) -> OptResult<SolveOutcome> {
        run_cg(problem, &self.opts, &self.name, observer)
    }
}

impl LassoSolver for CgSolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(&self, problem: &ProblemInstance) -> OptResult<SolveOutcome> {
        if self.opts.verbose {
            self.solve_observed(problem, &mut LogObserver::new(self.name.clone()))
        } else {
            self.solve_observed(problem, &mut NoopObserver)
        }
    }
}

/// Solve `problem` once with `opts`.
pub fn solve_group_lasso(problem: &ProblemInstance, opts: &CgOptions) -> OptResult<SolveOutcome> {
    CgSolver::new(*opts).solve(problem)
}
