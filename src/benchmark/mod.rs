//! benchmark — batch runs and performance profiles for solver variants.
//!
//! Purpose
//! -------
//! Compare group-LASSO solvers on a common set of problems: run them all
//! ([`batch::run_batch`]), store the per-problem, per-solver results
//! ([`data::PerformanceData`]), and summarize them as Dolan–Moré
//! performance profiles ([`profile::PerformanceProfileBuilder`]).
//!
//! Key behaviors
//! -------------
//! - Any [`LassoSolver`](crate::optimization::cg_solver::LassoSolver) can
//!   take part, so external baselines sit beside the CG variants.
//! - Only converged runs (status 0) produce ratios; other runs count as
//!   unsolved in every profile.
//! - Batches persist to JSON and can be profiled later.
//!
//! Downstream usage
//! ----------------
//! - Generate instances, call `run_batch`, then `PerformanceProfileBuilder::
//!   pairwise(Metric::Time)` (or `Iterations`) and plot the curves.
//!
//! Testing notes
//! -------------
//! - Unit tests beside each submodule; `tests/integration_benchmark.rs`
//!   runs the full batch → profile pipeline on seeded random instances.

pub mod batch;
pub mod data;
pub mod errors;
pub mod profile;

pub use self::batch::run_batch;
pub use self::data::{Metric, PerformanceData, PerformanceSample};
pub use self::errors::{ProfileError, ProfileResult};
pub use self::profile::{
    PairProfile, PerformanceProfileBuilder, ProfileCurve, ProfilePoint, profile, ratio,
};
