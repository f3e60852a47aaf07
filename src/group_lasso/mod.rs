//! group_lasso — problem data and cost model for group-LASSO regression.
//!
//! Purpose
//! -------
//! Own everything that describes *what* is being minimized, independent of
//! any particular solver:
//!
//! ```text
//!     minimize_x  ½‖A·x − b‖² + λ·Σ_g ‖x_g‖₂
//! ```
//!
//! Key behaviors
//! -------------
//! - [`Partition`] validates the contiguous block structure of `x`.
//! - [`ProblemInstance`] validates `(A, b, λ, partition, α)` once, up front,
//!   and is immutable afterwards.
//! - [`model`] evaluates the objective (with separately named smooth and
//!   penalty points), the gradient/subgradient, and a finite-difference
//!   gradient check.
//!
//! Invariants & assumptions
//! ------------------------
//! - A constructed `ProblemInstance` always satisfies `Σ n_g = n`,
//!   `b.len() = m`, finite data, `λ ≥ 0`, `α > 0`.
//! - Model functions never panic on bad evaluation points; they return
//!   [`ModelError`].
//!
//! Downstream usage
//! ----------------
//! - Solvers borrow a `ProblemInstance` and call [`model::gradient`] /
//!   [`model::objective`] on their iterates.
//! - Problem generators (external) build instances through
//!   [`ProblemInstance::new`] and surface [`ProblemError`] on bad input.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each submodule: validation branches in
//!   `partition`/`problem`, hand-computed values and finite-difference
//!   agreement in `model`.

pub mod errors;
pub mod model;
pub mod partition;
pub mod problem;

pub use self::errors::{ModelError, ModelResult, ProblemError, ProblemResult};
pub use self::model::EvalPoints;
pub use self::partition::Partition;
pub use self::problem::ProblemInstance;
