//! cg_solver — nonlinear conjugate gradient for group LASSO.
//!
//! Purpose
//! -------
//! Minimize `½‖A·x − b‖² + λ·Σ_g ‖x_g‖₂` with a nonlinear CG method whose
//! directions come from a memoryless scaled BFGS operator refreshed by
//! Beale–Powell restarts, and whose steps come from a bounded Brent line
//! search (argmin). An optional cubic-regularization variant retries
//! breakdowns with a closed-form step along `−c`.
//!
//! Key behaviors
//! -------------
//! - [`CgSolver`] implements [`LassoSolver`]; [`solve_group_lasso`] is the
//!   one-shot entry point.
//! - [`run::run_cg`] owns the iteration loop and produces a
//!   [`SolveOutcome`] with a [`RunHistory`].
//! - [`restart`] holds the restart counter, basis, and direction formulas.
//! - [`line_search`] restricts the objective to a ray and calls Brent.
//! - [`cubic`] computes cubic-regularization recovery steps.
//! - [`observer`] exposes per-iteration records (closures, `log` output).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every run starts at `x = 0.1·1ₙ` and is deterministic for a given
//!   problem and option set.
//! - Problem data are borrowed immutably; a solve never mutates `A` or `b`.
//! - Terminal states are [`SolveStatus`] codes 0–4; `OptError` means the
//!   options themselves were invalid.
//!
//! Conventions
//! -----------
//! - Convergence: `‖c‖ ≤ √n·abs_tol + rel_tol·‖x‖`.
//! - The restart cycle length is `n`.
//! - Relaxation `α` on the problem is carried unchanged; CG does not use it.
//!
//! Testing notes
//! -------------
//! - Unit tests beside each submodule; breakdown states are injected in
//!   `run` tests because a convex problem never produces them naturally.
//! - End-to-end behavior lives in `tests/integration_cg_pipeline.rs`.
pub mod api;
pub mod builders;
pub mod cubic;
pub mod line_search;
pub mod observer;
pub mod restart;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::api::{CgSolver, solve_group_lasso};
pub use self::observer::{IterationObserver, IterationRecord, LogObserver, NoopObserver};
pub use self::restart::RestartStage;
pub use self::traits::{
    CgOptions, CubicOptions, LassoSolver, LineSearchOptions, PenaltyModel, RunHistory,
    SolveOutcome, SolveStatus,
};
pub use self::types::{Grad, Point};

pub mod prelude {
    pub use super::{
        CgOptions, CgSolver, CubicOptions, IterationObserver, IterationRecord, LassoSolver,
        LineSearchOptions, PenaltyModel, RunHistory, SolveOutcome, SolveStatus,
        solve_group_lasso,
    };
}
