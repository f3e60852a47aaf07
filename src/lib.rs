//! group_lasso_cg — group LASSO via nonlinear conjugate gradient.
//!
//! Purpose
//! -------
//! Solve group-regularized least squares,
//!
//! ```text
//!     minimize_x  ½‖A·x − b‖² + λ·Σ_g ‖x_g‖₂
//! ```
//!
//! with a nonlinear CG method (memoryless scaled BFGS directions, Beale–Powell
//! restarts, bounded Brent line search, optional cubic-regularization
//! recovery), and benchmark solver variants against each other with
//! performance profiles.
//!
//! Key behaviors
//! -------------
//! - [`group_lasso`]: validated problem data and the objective/gradient model.
//! - [`optimization`]: solver options, the CG solver, and [`optimization::errors::OptError`].
//! - [`benchmark`]: rayon-parallel batch runs, JSON-persistable results, and
//!   ratio-based performance profiles.
//!
//! Invariants & assumptions
//! ------------------------
//! - Problem data are validated once at construction and borrowed
//!   immutably by every solve.
//! - A solve is sequential and deterministic; parallelism lives only in the
//!   batch harness, across problems.
//!
//! Conventions
//! -----------
//! - Numerical breakdowns are reported as `SolveStatus` codes 0–4; `Err`
//!   values signal invalid inputs or configuration.
//! - Diagnostics go through the `log` facade; the library installs no logger.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside the code; `tests/` holds end-to-end solver and
//!   benchmark pipelines on seeded random instances.

pub mod benchmark;
pub mod group_lasso;
pub mod optimization;

pub mod prelude {
    pub use crate::benchmark::{
        Metric, PerformanceData, PerformanceProfileBuilder, ProfileCurve, run_batch,
    };
    pub use crate::group_lasso::{Partition, ProblemError, ProblemInstance};
    pub use crate::optimization::prelude::*;
}
