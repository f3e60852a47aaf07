//! cg_solver::restart — Beale–Powell restart bookkeeping and directions.
//!
//! Purpose
//! -------
//! Compute the CG search direction from the current gradient, the previous
//! gradient, and the previous displacement, using a memoryless scaled BFGS
//! operator anchored at the last restart.
//!
//! Key behaviors
//! -------------
//! - The first iteration of a run is steepest descent, `dx = −c`.
//! - A restart rebuilds the basis `(pt, yt)` from the latest displacement
//!   and gradient change and uses the three-term direction `dx = −H_t c`.
//! - Between restarts the four-term direction applies one BFGS update to
//!   `H_t` with the latest `(s, y)` pair.
//! - Powell's test forces a restart when consecutive gradients are far from
//!   orthogonal (`|c·c0| > threshold·c·c`).
//!
//! Invariants & assumptions
//! ------------------------
//! - `cycle ∈ [0, n]` at all times; `cycle == n` means "restart next".
//! - A direction is only committed (basis installed, cycle advanced) after
//!   the runner's descent check passes.
//! - Degenerate secant denominators and non-finite directions are reported
//!   as [`DirectionFailure`], never as NaN directions.
//!
//! Conventions
//! -----------
//! - `H_t v = γv − (ptᵀv / ytᵀyt)·yt + (2·ptᵀv/ρ − ytᵀv / ytᵀyt)·pt` with
//!   `ρ = ptᵀyt` and `γ = ρ / ytᵀyt`.
//! - With `u = H_t c`, `w = H_t y`, `sy = sᵀy` the continuing direction is
//!   `−(u − (sᵀc/sy)·w + [(sᵀc/sy)(1 + yᵀw/sy) − yᵀu/sy]·s)`.
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::optimization::cg_solver::types::Grad;

/// Which rule produced a search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestartStage {
    /// First iteration (or cubic recovery): `dx = −c`.
    SteepestDescent,
    /// Scheduled restart after `n` continuing steps.
    FreshRestart,
    /// Four-term update on top of the stored basis.
    Continuing,
    /// Restart forced by Powell's orthogonality test.
    PowellTriggered,
}

/// Why no direction could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionFailure {
    /// `‖y‖` or `sᵀy` is numerically zero.
    DegenerateSecant,
    /// The direction contains NaN/±inf.
    NonFinite,
}

/// Restart pair `(pt, yt)` with cached inner products.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartBasis {
    pt: Array1<f64>,
    yt: Array1<f64>,
    pt_yt: f64,
    yt_yt: f64,
}

impl RestartBasis {
    /// Build a basis, rejecting degenerate pairs.
    ///
    /// # Errors
    /// [`DirectionFailure::DegenerateSecant`] if `‖yt‖ ≤ eps` or
    /// `|ptᵀyt| ≤ eps·‖pt‖·‖yt‖`.
    pub fn new(pt: Array1<f64>, yt: Array1<f64>, eps: f64) -> Result<Self, DirectionFailure> {
        let (pt_yt, yt_yt) = secant_products(pt.view(), yt.view(), eps)?;
        Ok(Self { pt, yt, pt_yt, yt_yt })
    }

    /// Apply the memoryless scaled BFGS operator: `H_t v`.
    pub fn apply(&self, v: ArrayView1<'_, f64>) -> Array1<f64> {
        let gamma = self.pt_yt / self.yt_yt;
        let pt_v = self.pt.dot(&v);
        let yt_v = self.yt.dot(&v);
        let mut out = v.to_owned() * gamma;
        out.scaled_add(-pt_v / self.yt_yt, &self.yt);
        out.scaled_add(2.0 * pt_v / self.pt_yt - yt_v / self.yt_yt, &self.pt);
        out
    }

    #[cfg(test)]
    pub(crate) fn pt_yt(&self) -> f64 {
        self.pt_yt
    }
}

/// Inputs for one direction computation.
///
/// - `c`: current gradient.
/// - `c0`: gradient at the previous iterate.
/// - `s`: previous displacement `α_prev·dx_prev`.
#[derive(Debug, Clone, Copy)]
pub struct DirectionInputs<'a> {
    pub c: ArrayView1<'a, f64>,
    pub c0: ArrayView1<'a, f64>,
    pub s: ArrayView1<'a, f64>,
}

/// A computed but not yet committed direction.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDirection {
    pub dx: Grad,
    pub stage: RestartStage,
    basis: Option<RestartBasis>,
}

/// Restart counter, stored basis, and sticky Powell flag.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartState {
    n: usize,
    cycle: usize,
    basis: Option<RestartBasis>,
    powell_triggered: bool,
    started: bool,
}

impl RestartState {
    /// Fresh state for an `n`-dimensional problem; the first direction will
    /// be steepest descent.
    pub fn new(n: usize) -> Self {
        Self { n, cycle: n, basis: None, powell_triggered: false, started: false }
    }

    pub fn cycle(&self) -> usize {
        self.cycle
    }

    pub fn powell_triggered(&self) -> bool {
        self.powell_triggered
    }

    /// Schedule a restart on the next call to [`plan`](Self::plan).
    pub fn force_restart(&mut self) {
        self.cycle = self.n;
    }

    /// Powell's test: fires only strictly inside a cycle.
    pub fn powell_test(&self, c: ArrayView1<'_, f64>, c0: ArrayView1<'_, f64>, threshold: f64) -> bool {
        self.cycle >= 1 && self.cycle < self.n && c.dot(&c0).abs() > threshold * c.dot(&c)
    }

    /// Compute the next search direction without changing the cycle or
    /// basis. A Powell restart sets the sticky flag immediately.
    ///
    /// # Errors
    /// [`DirectionFailure`] on a degenerate secant pair, a missing basis, or
    /// a non-finite direction.
    pub fn plan(
        &mut self, inputs: DirectionInputs<'_>, powell_threshold: f64, secant_eps: f64,
    ) -> Result<PlannedDirection, DirectionFailure> {
        if !self.started {
            return finite(PlannedDirection {
                dx: inputs.c.mapv(|v| -v),
                stage: RestartStage::SteepestDescent,
                basis: None,
            });
        }

        let mut stage = RestartStage::Continuing;
        if self.powell_test(inputs.c, inputs.c0, powell_threshold) {
            self.powell_triggered = true;
            self.cycle = self.n;
            stage = RestartStage::PowellTriggered;
        } else if self.cycle == self.n {
            stage = RestartStage::FreshRestart;
        }

        let y = &inputs.c - &inputs.c0;
        if stage == RestartStage::Continuing {
            let basis = self.basis.as_ref().ok_or(DirectionFailure::DegenerateSecant)?;
            let dx = continuing_direction(basis, inputs.c, inputs.s, y.view(), secant_eps)?;
            return finite(PlannedDirection { dx, stage, basis: None });
        }

        let basis = RestartBasis::new(inputs.s.to_owned(), y, secant_eps)?;
        let dx = -basis.apply(inputs.c);
        finite(PlannedDirection { dx, stage, basis: Some(basis) })
    }

    /// Install a planned direction's basis and advance the cycle counter.
    pub fn commit(&mut self, planned: PlannedDirection) {
        match planned.stage {
            RestartStage::SteepestDescent => {}
            RestartStage::FreshRestart | RestartStage::PowellTriggered => {
                self.basis = planned.basis;
                self.cycle = 0;
            }
            RestartStage::Continuing => self.cycle = (self.cycle + 1).min(self.n),
        }
        self.started = true;
    }

    #[cfg(test)]
    pub(crate) fn with_basis(n: usize, cycle: usize, basis: RestartBasis) -> Self {
        Self { n, cycle, basis: Some(basis), powell_triggered: false, started: true }
    }
}

fn continuing_direction(
    basis: &RestartBasis, c: ArrayView1<'_, f64>, s: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>,
    eps: f64,
) -> Result<Grad, DirectionFailure> {
    let (sy, _) = secant_products(s, y, eps)?;
    let u = basis.apply(c);
    let w = basis.apply(y);
    let sc = s.dot(&c);
    let coef_s = (sc / sy) * (1.0 + y.dot(&w) / sy) - y.dot(&u) / sy;
    let mut hg = u;
    hg.scaled_add(-sc / sy, &w);
    hg.scaled_add(coef_s, &s);
    Ok(-hg)
}

fn secant_products(
    s: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, eps: f64,
) -> Result<(f64, f64), DirectionFailure> {
    let yy = y.dot(&y);
    let y_norm = yy.sqrt();
    let sy = s.dot(&y);
    let s_norm = s.dot(&s).sqrt();
    if !(y_norm > eps) || !(sy.abs() > eps * s_norm * y_norm) {
        return Err(DirectionFailure::DegenerateSecant);
    }
    Ok((sy, yy))
}

fn finite(planned: PlannedDirection) -> Result<PlannedDirection, DirectionFailure> {
    if planned.dx.iter().all(|v| v.is_finite()) {
        Ok(planned)
    } else {
        Err(DirectionFailure::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The scaled BFGS operator: secant condition and symmetry.
    // - Stage selection: steepest descent, fresh restart, continuing, Powell.
    // - The cycle counter bounds and the sticky Powell flag.
    // - Degenerate secant detection.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `H_t` satisfies the secant equation `H_t yt = pt`.
    //
    // Given
    // -----
    // - A generic pair with `ptᵀyt > 0`.
    //
    // Expect
    // ------
    // - `apply(yt) ≈ pt`.
    fn basis_satisfies_secant_equation() {
        let pt = array![0.5, -1.0, 2.0];
        let yt = array![1.0, -0.5, 1.5];
        let basis = RestartBasis::new(pt.clone(), yt.clone(), 1e-12).unwrap();
        let hy = basis.apply(yt.view());
        for (a, b) in hy.iter().zip(pt.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // `H_t` is symmetric as a linear map.
    //
    // Given
    // -----
    // - The operator materialized column by column on `R³`.
    //
    // Expect
    // ------
    // - `H[i, j] == H[j, i]`.
    fn basis_operator_is_symmetric() {
        let basis =
            RestartBasis::new(array![0.3, 1.0, -0.2], array![0.4, 0.9, 0.1], 1e-12).unwrap();
        let eye = Array2::<f64>::eye(3);
        let cols: Vec<_> = eye.columns().into_iter().map(|e| basis.apply(e)).collect();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(cols[j][i], cols[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Stages follow steepest descent → fresh restart → continuing, and the
    // cycle counter stays in `[0, n]`.
    //
    // Given
    // -----
    // - `n = 2`; gradients chosen orthogonal enough to skip Powell.
    //
    // Expect
    // ------
    // - Stages in that order; cycle n, 0, 1, 2 after each commit, then a
    //   fresh restart.
    fn stages_progress_through_a_cycle() {
        // Arrange
        let mut state = RestartState::new(2);
        let c0 = array![1.0, 0.0];
        let c = array![0.0, 1.0];
        let s = array![-1.0, 0.5];
        let inputs = DirectionInputs { c: c.view(), c0: c0.view(), s: s.view() };

        // Act / Assert
        let first = state.plan(inputs, 0.2, 1e-12).unwrap();
        assert_eq!(first.stage, RestartStage::SteepestDescent);
        assert_eq!(first.dx, array![0.0, -1.0]);
        state.commit(first);
        assert_eq!(state.cycle(), 2);

        let fresh = state.plan(inputs, 0.2, 1e-12).unwrap();
        assert_eq!(fresh.stage, RestartStage::FreshRestart);
        state.commit(fresh);
        assert_eq!(state.cycle(), 0);

        for expected_cycle in 1..=2 {
            let cont = state.plan(inputs, 0.2, 1e-12).unwrap();
            assert_eq!(cont.stage, RestartStage::Continuing);
            state.commit(cont);
            assert_eq!(state.cycle(), expected_cycle);
        }

        let again = state.plan(inputs, 0.2, 1e-12).unwrap();
        assert_eq!(again.stage, RestartStage::FreshRestart);
        assert!(!state.powell_triggered());
    }

    #[test]
    // Purpose
    // -------
    // Powell's test forces a restart inside a cycle and its flag is sticky.
    //
    // Given
    // -----
    // - Cycle 1 of `n = 3`, `c = c0 + small change` so `|c·c0| ≫ 0.2·c·c`.
    //
    // Expect
    // ------
    // - Stage `PowellTriggered`, cycle reset to 0 on commit, flag stays set
    //   after a later ordinary step.
    fn powell_restart_is_sticky() {
        // Arrange
        let basis =
            RestartBasis::new(array![1.0, 0.0, 0.0], array![1.0, 0.0, 0.0], 1e-12).unwrap();
        let mut state = RestartState::with_basis(3, 1, basis);
        let c0 = array![1.0, 1.0, 0.0];
        let c = array![1.1, 0.9, 0.1];
        let s = array![0.2, -0.1, 0.3];

        // Act
        let planned =
            state.plan(DirectionInputs { c: c.view(), c0: c0.view(), s: s.view() }, 0.2, 1e-12);

        // Assert
        let planned = planned.unwrap();
        assert_eq!(planned.stage, RestartStage::PowellTriggered);
        state.commit(planned);
        assert_eq!(state.cycle(), 0);
        assert!(state.powell_triggered());

        let c_orth = array![0.0, 0.0, 1.0];
        let next = state
            .plan(DirectionInputs { c: c_orth.view(), c0: c.view(), s: s.view() }, 0.2, 1e-12)
            .unwrap();
        assert_eq!(next.stage, RestartStage::Continuing);
        state.commit(next);
        assert!(state.powell_triggered());
    }

    #[test]
    // Purpose
    // -------
    // A zero gradient change is reported as a degenerate secant.
    //
    // Given
    // -----
    // - `c == c0` at a scheduled restart.
    //
    // Expect
    // ------
    // - `Err(DegenerateSecant)`.
    fn equal_gradients_are_degenerate() {
        let mut state = RestartState::new(2);
        let c = array![1.0, 2.0];
        let s = array![0.1, 0.1];
        let inputs = DirectionInputs { c: c.view(), c0: c.view(), s: s.view() };
        let first = state.plan(inputs, 0.2, 1e-12).unwrap();
        state.commit(first);
        assert_eq!(state.plan(inputs, 0.2, 1e-12), Err(DirectionFailure::DegenerateSecant));
    }

    #[test]
    // Purpose
    // -------
    // On a quadratic with exact steps, the restart direction from a positive
    // curvature pair is a descent direction.
    //
    // Given
    // -----
    // - `pt`, `yt` with `ptᵀyt > 0` and an arbitrary gradient.
    //
    // Expect
    // ------
    // - `dx·c < 0`.
    fn positive_curvature_restart_descends() {
        let basis = RestartBasis::new(array![1.0, 2.0], array![2.0, 1.0], 1e-12).unwrap();
        assert!(basis.pt_yt() > 0.0);
        let c = array![0.7, -0.3];
        let dx = -basis.apply(c.view());
        assert!(dx.dot(&c) < 0.0);
    }
}
