//! Public API surface for the group-LASSO CG solver.
//!
//! - [`LassoSolver`]: capability interface every solver variant implements.
//! - [`CgOptions`], [`LineSearchOptions`], [`CubicOptions`]: validated
//!   configuration.
//! - [`PenaltyModel`]: how the line search treats the nonsmooth penalty.
//! - [`SolveStatus`], [`RunHistory`], [`SolveOutcome`]: what a solve returns.
//!
//! Convention: configuration is immutable once built. Numerical breakdowns
//! inside a solve are reported through [`SolveStatus`], never through
//! `OptError`; `OptError` is reserved for invalid configuration and inputs.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    group_lasso::ProblemInstance,
    optimization::{
        cg_solver::{
            types::{
                DEFAULT_ABS_TOL, DEFAULT_CUBIC_GROWTH, DEFAULT_CUBIC_MAX_TRIES, DEFAULT_CUBIC_SIGMA0,
                DEFAULT_GROUP_NORM_EPS, DEFAULT_LS_LOWER, DEFAULT_LS_MAX_ITER, DEFAULT_LS_TOL,
                DEFAULT_LS_UPPER, DEFAULT_MAX_ITER, DEFAULT_POWELL_THRESHOLD, DEFAULT_REL_TOL,
                DEFAULT_SECANT_EPS, Point,
            },
            validation::{
                verify_bounds, verify_max_iter, verify_powell_threshold, verify_safeguard,
                verify_tolerances,
            },
        },
        errors::{OptError, OptResult},
    },
};

/// Capability interface shared by all group-LASSO solver variants.
///
/// Implementors take a validated problem and return the final iterate and
/// its run history. The batch harness and the performance-profile builder
/// only see this trait, so a CG variant and an external baseline (e.g. an
/// ADMM implementation) can be benchmarked side by side.
///
/// Implementors must be `Sync`: the batch harness shares one solver across
/// worker threads, and each call to `solve` owns all of its mutable state.
pub trait LassoSolver: Sync {
    /// Short, stable name used as a column label in benchmark output.
    fn name(&self) -> &str;

    /// Solve one problem instance.
    ///
    /// # Errors
    /// Only for invalid inputs/configuration; numerical failures are
    /// reported in `SolveOutcome::history.status`.
    fn solve(&self, problem: &ProblemInstance) -> OptResult<SolveOutcome>;
}

/// How the line-search objective treats the group-norm penalty.
///
/// Both variants evaluate the smooth term at the trial point and take the
/// penalty's norms only at the pre-step iterate `x₀`:
/// - `Frozen`: `φ(a) = ½‖A(x₀ + a·d) − b‖² + P(x₀)`; the penalty is a
///   constant along the line.
/// - `Linearized`: `φ(a) = ½‖A(x₀ + a·d) − b‖² + P(x₀) + a·⟨∂P(x₀), d⟩`.
///
/// Parsing accepts case-insensitive `"frozen"` / `"linearized"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenaltyModel {
    Frozen,
    Linearized,
}

impl FromStr for PenaltyModel {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frozen" => Ok(PenaltyModel::Frozen),
            "linearized" => Ok(PenaltyModel::Linearized),
            _ => Err(OptError::InvalidParameter {
                text: format!(
                    "unknown penalty model '{s}'; valid options are case insensitive 'Frozen' or 'Linearized'"
                ),
            }),
        }
    }
}

/// Bounded line-search configuration.
///
/// - `lower`, `upper`: step-length interval, `0 ≤ lower < upper`.
/// - `tol`: absolute tolerance on the step length.
/// - `max_iter`: Brent iteration budget; exhausting it is a line-search
///   failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSearchOptions {
    pub lower: f64,
    pub upper: f64,
    pub tol: f64,
    pub max_iter: usize,
}

impl LineSearchOptions {
    /// Construct validated line-search options.
    ///
    /// # Errors
    /// - [`OptError::InvalidLineSearchBounds`] for a bad interval.
    /// - [`OptError::InvalidTolerance`] if `tol` is not finite and positive.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(lower: f64, upper: f64, tol: f64, max_iter: usize) -> OptResult<Self> {
        verify_bounds(lower, upper)?;
        if !tol.is_finite() || tol <= 0.0 {
            return Err(OptError::InvalidTolerance {
                name: "line_search.tol",
                tol,
                reason: "Tolerance must be finite and positive.",
            });
        }
        verify_max_iter(max_iter)?;
        Ok(Self { lower, upper, tol, max_iter })
    }
}

impl Default for LineSearchOptions {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LS_LOWER,
            upper: DEFAULT_LS_UPPER,
            tol: DEFAULT_LS_TOL,
            max_iter: DEFAULT_LS_MAX_ITER,
        }
    }
}

/// Cubic-regularization step settings.
///
/// - `sigma0`: initial cubic weight `σ > 0`.
/// - `growth`: factor `> 1` applied to `σ` after a rejected trial.
/// - `max_tries`: number of trials before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicOptions {
    pub sigma0: f64,
    pub growth: f64,
    pub max_tries: usize,
}

impl CubicOptions {
    /// Construct validated cubic-regularization options.
    ///
    /// # Errors
    /// [`OptError::InvalidCubic`] if `sigma0 ≤ 0`, `growth ≤ 1`, either is
    /// non-finite, or `max_tries == 0`.
    pub fn new(sigma0: f64, growth: f64, max_tries: usize) -> OptResult<Self> {
        if !sigma0.is_finite() || sigma0 <= 0.0 {
            return Err(OptError::InvalidCubic {
                name: "sigma0",
                value: sigma0,
                reason: "must be finite and positive",
            });
        }
        if !growth.is_finite() || growth <= 1.0 {
            return Err(OptError::InvalidCubic {
                name: "growth",
                value: growth,
                reason: "must be finite and greater than one",
            });
        }
        if max_tries == 0 {
            return Err(OptError::InvalidCubic {
                name: "max_tries",
                value: 0.0,
                reason: "must be at least one",
            });
        }
        Ok(Self { sigma0, growth, max_tries })
    }
}

impl Default for CubicOptions {
    fn default() -> Self {
        Self {
            sigma0: DEFAULT_CUBIC_SIGMA0,
            growth: DEFAULT_CUBIC_GROWTH,
            max_tries: DEFAULT_CUBIC_MAX_TRIES,
        }
    }
}

/// Solver-level configuration.
///
/// Fields:
/// - `max_iter`: iteration cap.
/// - `abs_tol`, `rel_tol`: convergence when `‖c‖ ≤ √n·abs_tol + rel_tol·‖x‖`.
/// - `line_search`: bounded line-search settings.
/// - `powell_threshold`: restart when `|c·c0| / (c·c)` exceeds it.
/// - `secant_eps`: relative threshold for degenerate secant denominators.
/// - `group_norm_eps`: absolute zero threshold for group slices.
/// - `penalty_model`: line-search treatment of the penalty.
/// - `cubic`: `Some` selects the cubic-regularization variant.
/// - `verbose`: if `true`, per-iteration records go to the `log` facade.
///
/// Default:
/// - `max_iter = 1000`, `abs_tol = 1e-4`, `rel_tol = 1e-2`,
///   line search on `[0, 10]`, `powell_threshold = 0.2`,
///   `penalty_model = Linearized`, `cubic = None`, `verbose = false`.
///
/// `PenaltyModel::Frozen` is the reference line-search contract, but it is
/// not the default: on `A = I`, `b = [3, 4]`, λ = 1 it stalls near
/// `[2.76, 4.16]`, past the unpenalized fit, while `Linearized` reaches the
/// shrunk solution `[2, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CgOptions {
    pub max_iter: usize,
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub line_search: LineSearchOptions,
    pub powell_threshold: f64,
    pub secant_eps: f64,
    pub group_norm_eps: f64,
    pub penalty_model: PenaltyModel,
    pub cubic: Option<CubicOptions>,
    pub verbose: bool,
}

impl CgOptions {
    /// Create options with explicit stopping rules; every other field takes
    /// its default and can be adjusted with the `with_*` methods.
    ///
    /// # Errors
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    /// - [`OptError::InvalidTolerance`] for bad tolerances.
    pub fn new(
        max_iter: usize, abs_tol: f64, rel_tol: f64, line_search: LineSearchOptions,
    ) -> OptResult<Self> {
        verify_max_iter(max_iter)?;
        verify_tolerances(abs_tol, rel_tol)?;
        Ok(Self { max_iter, abs_tol, rel_tol, line_search, ..Self::default() })
    }

    /// Override the Powell restart threshold.
    pub fn with_powell_threshold(mut self, value: f64) -> OptResult<Self> {
        verify_powell_threshold(value)?;
        self.powell_threshold = value;
        Ok(self)
    }

    /// Override the secant and zero-group thresholds.
    pub fn with_safeguards(mut self, secant_eps: f64, group_norm_eps: f64) -> OptResult<Self> {
        verify_safeguard("secant_eps", secant_eps)?;
        verify_safeguard("group_norm_eps", group_norm_eps)?;
        self.secant_eps = secant_eps;
        self.group_norm_eps = group_norm_eps;
        Ok(self)
    }

    pub fn with_penalty_model(mut self, model: PenaltyModel) -> Self {
        self.penalty_model = model;
        self
    }

    /// Select the cubic-regularization variant.
    pub fn with_cubic(mut self, cubic: CubicOptions) -> Self {
        self.cubic = Some(cubic);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Re-check every field, including those set directly on the struct.
    pub fn validate(&self) -> OptResult<()> {
        verify_max_iter(self.max_iter)?;
        verify_tolerances(self.abs_tol, self.rel_tol)?;
        let ls = self.line_search;
        LineSearchOptions::new(ls.lower, ls.upper, ls.tol, ls.max_iter)?;
        verify_powell_threshold(self.powell_threshold)?;
        verify_safeguard("secant_eps", self.secant_eps)?;
        verify_safeguard("group_norm_eps", self.group_norm_eps)?;
        if let Some(cubic) = self.cubic {
            CubicOptions::new(cubic.sigma0, cubic.growth, cubic.max_tries)?;
        }
        Ok(())
    }
}

impl Default for CgOptions {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            abs_tol: DEFAULT_ABS_TOL,
            rel_tol: DEFAULT_REL_TOL,
            line_search: LineSearchOptions::default(),
            powell_threshold: DEFAULT_POWELL_THRESHOLD,
            secant_eps: DEFAULT_SECANT_EPS,
            group_norm_eps: DEFAULT_GROUP_NORM_EPS,
            penalty_model: PenaltyModel::Linearized,
            cubic: None,
            verbose: false,
        }
    }
}

/// Terminal status of a solve.
///
/// | Code | Variant              | Meaning                                        |
/// |------|----------------------|------------------------------------------------|
/// | 0    | `Converged`          | gradient-norm criterion satisfied              |
/// | 1    | `NonDescent`         | direction failed `dx·c < 0`                    |
/// | 2    | `IterLimit`          | iteration cap reached                          |
/// | 3    | `DirectionUndefined` | degenerate secant/zero group/non-finite values |
/// | 4    | `LineSearchFailed`   | bounded line search found no step              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    Converged,
    NonDescent,
    IterLimit,
    DirectionUndefined,
    LineSearchFailed,
}

impl SolveStatus {
    /// Numeric status code `0..=4`.
    pub fn code(self) -> u8 {
        match self {
            SolveStatus::Converged => 0,
            SolveStatus::NonDescent => 1,
            SolveStatus::IterLimit => 2,
            SolveStatus::DirectionUndefined => 3,
            SolveStatus::LineSearchFailed => 4,
        }
    }

    /// Inverse of [`SolveStatus::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SolveStatus::Converged),
            1 => Some(SolveStatus::NonDescent),
            2 => Some(SolveStatus::IterLimit),
            3 => Some(SolveStatus::DirectionUndefined),
            4 => Some(SolveStatus::LineSearchFailed),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        self == SolveStatus::Converged
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SolveStatus::Converged => "converged",
            SolveStatus::NonDescent => "non-descent direction",
            SolveStatus::IterLimit => "iteration limit reached",
            SolveStatus::DirectionUndefined => "search direction undefined",
            SolveStatus::LineSearchFailed => "line search failed",
        };
        write!(f, "{text} (status {})", self.code())
    }
}

/// Per-run record returned alongside the solution.
///
/// - `objective_trace[k]`, `grad_norm_trace[k]`: full objective and `‖c‖₂`
///   after iteration `k + 1`. Both have length `iterations`.
/// - `elapsed_secs`: wall time of the solve.
/// - `powell_restart_triggered`: a Powell restart fired at least once.
/// - `cubic_invoked` / `cubic_steps`: whether / how often a cubic step was
///   accepted (always `false` / `0` for the plain variant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    pub objective_trace: Vec<f64>,
    pub grad_norm_trace: Vec<f64>,
    pub elapsed_secs: f64,
    pub iterations: usize,
    pub status: SolveStatus,
    pub powell_restart_triggered: bool,
    pub cubic_invoked: bool,
    pub cubic_steps: usize,
}

/// Final iterate plus its history.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub x: Point,
    pub history: RunHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Documented defaults of `CgOptions`.
    // - Validation in the option constructors and `with_*` overrides.
    // - `SolveStatus` code mapping and `PenaltyModel` parsing.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `CgOptions::default` matches the documented reference settings.
    //
    // Given
    // -----
    // - No inputs.
    //
    // Expect
    // ------
    // - 1000 iterations, tolerances 1e-4 / 1e-2, bounds [0, 10], Powell 0.2,
    //   linearized penalty, no cubic step, quiet.
    fn cg_options_default_matches_documented_values() {
        let opts = CgOptions::default();
        assert_eq!(opts.max_iter, 1000);
        assert_eq!(opts.abs_tol, 1e-4);
        assert_eq!(opts.rel_tol, 1e-2);
        assert_eq!((opts.line_search.lower, opts.line_search.upper), (0.0, 10.0));
        assert_eq!(opts.powell_threshold, 0.2);
        assert_eq!(opts.penalty_model, PenaltyModel::Linearized);
        assert!(opts.cubic.is_none());
        assert!(!opts.verbose);
    }

    #[test]
    // Purpose
    // -------
    // Constructors reject invalid inputs and keep valid ones verbatim.
    //
    // Given
    // -----
    // - A zero iteration cap, a zero line-search tolerance, a growth of 1,
    //   and a valid custom configuration.
    //
    // Expect
    // ------
    // - Errors for the invalid ones; fields preserved for the valid one.
    fn option_constructors_validate() {
        assert!(matches!(
            CgOptions::new(0, 1e-4, 1e-2, LineSearchOptions::default()),
            Err(OptError::InvalidMaxIter { .. })
        ));
        assert!(LineSearchOptions::new(0.0, 10.0, 0.0, 100).is_err());
        assert!(matches!(
            CubicOptions::new(1.0, 1.0, 10),
            Err(OptError::InvalidCubic { name: "growth", .. })
        ));

        let ls = LineSearchOptions::new(0.0, 5.0, 1e-9, 200).expect("valid line search");
        let opts = CgOptions::new(50, 1e-6, 0.0, ls)
            .and_then(|o| o.with_powell_threshold(0.5))
            .expect("valid options")
            .with_cubic(CubicOptions::default());
        assert_eq!(opts.max_iter, 50);
        assert_eq!(opts.line_search.upper, 5.0);
        assert_eq!(opts.powell_threshold, 0.5);
        assert!(opts.cubic.is_some());
    }

    #[test]
    // Purpose
    // -------
    // Status codes are 0..=4 in the documented order and invertible.
    //
    // Given
    // -----
    // - Every variant.
    //
    // Expect
    // ------
    // - `from_code(code(s)) == Some(s)`; only `Converged` is a success.
    fn status_codes_round_trip() {
        let all = [
            SolveStatus::Converged,
            SolveStatus::NonDescent,
            SolveStatus::IterLimit,
            SolveStatus::DirectionUndefined,
            SolveStatus::LineSearchFailed,
        ];
        for (expected, status) in all.into_iter().enumerate() {
            assert_eq!(status.code() as usize, expected);
            assert_eq!(SolveStatus::from_code(status.code()), Some(status));
            assert_eq!(status.is_success(), expected == 0);
        }
        assert_eq!(SolveStatus::from_code(5), None);
    }

    #[test]
    // Purpose
    // -------
    // Penalty model names parse case-insensitively.
    //
    // Given
    // -----
    // - "FROZEN", "Linearized", "exact".
    //
    // Expect
    // ------
    // - The two known names parse; "exact" is rejected.
    fn penalty_model_parses_case_insensitively() {
        assert_eq!("FROZEN".parse::<PenaltyModel>(), Ok(PenaltyModel::Frozen));
        assert_eq!("Linearized".parse::<PenaltyModel>(), Ok(PenaltyModel::Linearized));
        assert!("exact".parse::<PenaltyModel>().is_err());
    }
}
