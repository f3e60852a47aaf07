//! cg_solver::types — shared numeric aliases, defaults, and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types, documented defaults, and the argmin solver
//! alias used by the CG solver so the rest of the module stays agnostic to
//! `ndarray` and argmin generics.
//!
//! Conventions
//! -----------
//! - Iterates and gradients are `ndarray::Array1<f64>` of length `n`.
//! - Step lengths along a direction are plain `f64`.
//! - Defaults mirror the reference solver: 1000 iterations, absolute
//!   tolerance 1e-4, relative tolerance 1e-2, line search on `[0, 10]`,
//!   Powell threshold 0.2.
use argmin::core::IterState;
use argmin::solver::brent::BrentOpt;
use ndarray::Array1;

/// Coefficient vector `x`.
pub type Point = Array1<f64>;

/// Gradient (or search-direction) vector, same shape as [`Point`].
pub type Grad = Array1<f64>;

/// Step length `a` along a search direction.
pub type Step = f64;

/// Brent's bounded scalar minimizer specialized to step lengths.
pub type BrentLS = BrentOpt<Step>;

/// argmin iteration state for the scalar line search.
pub type LineSearchState = IterState<Step, (), (), (), (), f64>;

/// Starting value of every coordinate of `x`.
pub const INITIAL_COORDINATE: f64 = 0.1;

pub const DEFAULT_MAX_ITER: usize = 1000;
pub const DEFAULT_ABS_TOL: f64 = 1e-4;
pub const DEFAULT_REL_TOL: f64 = 1e-2;

pub const DEFAULT_LS_LOWER: f64 = 0.0;
pub const DEFAULT_LS_UPPER: f64 = 10.0;
/// Absolute tolerance on the step length handed to Brent's method.
pub const DEFAULT_LS_TOL: f64 = 1e-8;
pub const DEFAULT_LS_MAX_ITER: usize = 500;

/// `|c·c0| / (c·c)` above this forces a restart.
pub const DEFAULT_POWELL_THRESHOLD: f64 = 0.2;

/// Relative threshold for secant denominators (`‖y‖`, `sᵀy`).
pub const DEFAULT_SECANT_EPS: f64 = 1e-12;

/// Absolute threshold on `‖x_g‖₂` below which the subgradient is undefined.
pub const DEFAULT_GROUP_NORM_EPS: f64 = 1e-12;

pub const DEFAULT_CUBIC_SIGMA0: f64 = 1.0;
pub const DEFAULT_CUBIC_GROWTH: f64 = 2.0;
pub const DEFAULT_CUBIC_MAX_TRIES: usize = 30;

/// History vectors are pre-sized to `min(max_iter, HISTORY_PREALLOC)`.
pub const HISTORY_PREALLOC: usize = 1024;
