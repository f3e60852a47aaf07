//! cg_solver::builders — argmin solver construction for the line search.
//!
//! Purpose
//! -------
//! Hide argmin's Brent wiring behind a single helper that applies the
//! crate's [`LineSearchOptions`], so the runner never touches argmin
//! generics directly.
//!
//! Conventions
//! -----------
//! - The step-length tolerance in `LineSearchOptions::tol` is Brent's
//!   absolute tolerance `t`; the relative tolerance is `√ε_machine`.
//! - The iteration cap is applied by the executor, not here.
use argmin::solver::brent::BrentOpt;

use crate::optimization::cg_solver::{traits::LineSearchOptions, types::BrentLS};

/// Construct a Brent minimizer over `[opts.lower, opts.upper]`.
pub fn build_brent(opts: &LineSearchOptions) -> BrentLS {
    BrentOpt::new(opts.lower, opts.upper).set_tolerance(f64::EPSILON.sqrt(), opts.tol)
}
