//! optimization — CG solver for group LASSO and the unified error surface.
//!
//! Purpose
//! -------
//! Provide the solver layer on top of [`crate::group_lasso`]: configuration,
//! the nonlinear CG iteration with Beale–Powell restarts, its line search and
//! cubic-regularization variant, and a single error/result pair for invalid
//! configuration.
//!
//! Key behaviors
//! -------------
//! - `cg_solver` exposes [`cg_solver::CgSolver`] and the
//!   [`cg_solver::LassoSolver`] trait used by the benchmark harness.
//! - `errors` normalizes configuration issues, problem/model errors, and
//!   argmin backend errors into [`errors::OptError`].
//!
//! Conventions
//! -----------
//! - Numerical breakdowns are solve statuses, not errors.
//! - Per-iteration progress goes through the `log` facade when verbose;
//!   nothing here prints directly.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules; end-to-end solves in
//!   `tests/integration_cg_pipeline.rs`.

pub mod cg_solver;
pub mod errors;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use group_lasso_cg::optimization::prelude::*;
//
// to import the main solver surface in a single line.

pub mod prelude {
    pub use super::cg_solver::prelude::*;
    pub use super::errors::{OptError, OptResult};
}
