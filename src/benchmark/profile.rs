//! benchmark::profile — Dolan–Moré performance profiles.
//!
//! Purpose
//! -------
//! Compare solvers on a common set of problems. For each problem the best
//! successful solver defines the baseline; every other successful solver is
//! scored by its ratio to that baseline. A profile curve then reports, for
//! each ratio level `τ`, the fraction of problems a solver solved within a
//! factor `τ` of the best.
//!
//! Key behaviors
//! -------------
//! - [`ratio`] maps a `[problem, solver]` metric matrix to ratios, leaving
//!   unsuccessful entries undefined (`None`).
//! - [`profile`] turns one solver's ratio column into a [`ProfileCurve`].
//! - [`PerformanceProfileBuilder`] applies both to the solver pairs of a
//!   [`PerformanceData`] batch.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rows where every solver succeeded have ratios `≥ 1` with the minimum
//!   exactly `1`.
//! - Curves are strictly increasing in `τ`, non-decreasing in probability,
//!   and their last probability is at most `1`.
//! - Undefined ratios count in a curve's denominator but never as solved.
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::{
    benchmark::{
        data::{Metric, PerformanceData},
        errors::{ProfileError, ProfileResult},
    },
    optimization::cg_solver::SolveStatus,
};

/// One step of a profile curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub tau: f64,
    pub probability: f64,
}

/// Step function `τ ↦ P(ratio ≤ τ)` for one solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileCurve {
    points: Vec<ProfilePoint>,
}

impl ProfileCurve {
    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fraction of problems solved within ratio `tau` (0 below the first step).
    pub fn probability_at(&self, tau: f64) -> f64 {
        self.points.iter().take_while(|p| p.tau <= tau).last().map_or(0.0, |p| p.probability)
    }
}

/// Per-entry performance ratios.
///
/// `ratio[[p, s]] = metric[[p, s]] / min_{s' successful} metric[[p, s']]`
/// when `status[[p, s]]` is `Converged`, otherwise `None`.
///
/// # Errors
/// - [`ProfileError::ShapeMismatch`] if the two matrices differ in shape.
/// - [`ProfileError::NonPositiveMetric`] for a successful entry whose metric
///   is not finite and strictly positive.
pub fn ratio(
    metric: ArrayView2<'_, f64>, status: ArrayView2<'_, SolveStatus>,
) -> ProfileResult<Array2<Option<f64>>> {
    if metric.dim() != status.dim() {
        return Err(ProfileError::ShapeMismatch {
            what: "status",
            expected: metric.dim(),
            found: status.dim(),
        });
    }
    let mut out = Array2::from_elem(metric.dim(), None);
    for (p, (m_row, s_row)) in metric.outer_iter().zip(status.outer_iter()).enumerate() {
        let mut best = f64::INFINITY;
        for (s, (&value, status)) in m_row.iter().zip(s_row.iter()).enumerate() {
            if !status.is_success() {
                continue;
            }
            if !value.is_finite() || value <= 0.0 {
                return Err(ProfileError::NonPositiveMetric { problem: p, solver: s, value });
            }
            best = best.min(value);
        }
        for (s, (&value, status)) in m_row.iter().zip(s_row.iter()).enumerate() {
            if status.is_success() {
                out[[p, s]] = Some(value / best);
            }
        }
    }
    Ok(out)
}

/// Profile curve of one solver's ratio column.
///
/// One point per distinct defined ratio `τ` (ascending), with probability
/// `#{p : ratio_p ≤ τ} / #problems`. An all-undefined column gives an empty
/// curve.
pub fn profile(ratios: ArrayView1<'_, Option<f64>>) -> ProfileCurve {
    let total = ratios.len() as f64;
    let mut defined: Vec<f64> = ratios.iter().flatten().copied().collect();
    defined.sort_by(f64::total_cmp);
    let mut points: Vec<ProfilePoint> = Vec::new();
    for (k, &tau) in defined.iter().enumerate() {
        let probability = (k + 1) as f64 / total;
        match points.last_mut() {
            Some(last) if last.tau == tau => last.probability = probability,
            _ => points.push(ProfilePoint { tau, probability }),
        }
    }
    ProfileCurve { points }
}

/// Profiles of two solvers compared head to head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairProfile {
    pub solvers: (usize, usize),
    pub names: (String, String),
    pub metric: Metric,
    pub n_problems: usize,
    pub first: ProfileCurve,
    pub second: ProfileCurve,
}

/// Builds pairwise profiles from a benchmark batch.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceProfileBuilder<'a> {
    data: &'a PerformanceData,
}

impl<'a> PerformanceProfileBuilder<'a> {
    pub fn new(data: &'a PerformanceData) -> Self {
        Self { data }
    }

    /// Compare solvers `i` and `j` over every problem.
    ///
    /// # Errors
    /// Unknown or identical indices, and the errors of [`ratio`].
    pub fn pair(&self, i: usize, j: usize, metric: Metric) -> ProfileResult<PairProfile> {
        let rows: Vec<usize> = (0..self.data.n_problems()).collect();
        self.pair_on_rows(i, j, metric, &rows)
    }

    /// One [`PairProfile`] for every unordered solver pair `i < j`.
    pub fn pairwise(&self, metric: Metric) -> ProfileResult<Vec<PairProfile>> {
        let n = self.data.n_solvers();
        let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                out.push(self.pair(i, j, metric)?);
            }
        }
        Ok(out)
    }

    /// Compare `i` and `j` only on problems where solver `cubic_solver`
    /// actually took a cubic step.
    pub fn pair_where_cubic_invoked(
        &self, i: usize, j: usize, metric: Metric, cubic_solver: usize,
    ) -> ProfileResult<PairProfile> {
        self.data.check_solver(cubic_solver)?;
        let invoked = self.data.cubic_invoked();
        let rows: Vec<usize> =
            (0..self.data.n_problems()).filter(|&p| invoked[[p, cubic_solver]]).collect();
        self.pair_on_rows(i, j, metric, &rows)
    }

    fn pair_on_rows(
        &self, i: usize, j: usize, metric: Metric, rows: &[usize],
    ) -> ProfileResult<PairProfile> {
        self.data.check_solver(i)?;
        self.data.check_solver(j)?;
        if i == j {
            return Err(ProfileError::SamePair { first: i, second: j });
        }
        let values = self.data.metric(metric).select(Axis(0), rows);
        let status = self.data.status().select(Axis(0), rows);
        let pick = [i, j];
        let values = values.select(Axis(1), &pick);
        let status = status.select(Axis(1), &pick);
        let ratios = ratio(values.view(), status.view())?;
        let names = self.data.solver_names();
        Ok(PairProfile {
            solvers: (i, j),
            names: (names[i].clone(), names[j].clone()),
            metric,
            n_problems: rows.len(),
            first: profile(ratios.column(0)),
            second: profile(ratios.column(1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    const OK: SolveStatus = SolveStatus::Converged;
    const FAIL: SolveStatus = SolveStatus::IterLimit;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `ratio` on all-success rows, mixed rows, and invalid metrics.
    // - `profile` shape properties and the undefined-entry denominator.
    // - The builder's pair selection and cubic-restricted subsets.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // All-success rows have ratios ≥ 1 with the best exactly 1.
    //
    // Given
    // -----
    // - Metrics `[[2, 4, 3], [5, 5, 10]]`, every status converged.
    //
    // Expect
    // ------
    // - Row 0: `[1, 2, 1.5]`; row 1: `[1, 1, 2]`.
    fn all_success_rows_are_normalized_by_best() {
        // Arrange
        let metric = array![[2.0, 4.0, 3.0], [5.0, 5.0, 10.0]];
        let status = Array2::from_elem((2, 3), OK);

        // Act
        let r = ratio(metric.view(), status.view()).unwrap();

        // Assert
        assert_eq!(r[[0, 0]], Some(1.0));
        assert_eq!(r[[0, 1]], Some(2.0));
        assert_eq!(r[[0, 2]], Some(1.5));
        assert_eq!(r.row(1).to_vec(), vec![Some(1.0), Some(1.0), Some(2.0)]);
        for row in r.outer_iter() {
            let min = row.iter().flatten().copied().fold(f64::INFINITY, f64::min);
            assert_eq!(min, 1.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Failed entries are undefined and do not set the baseline.
    //
    // Given
    // -----
    // - Row `[1 (failed), 4, 2]`; row with every solver failed.
    //
    // Expect
    // ------
    // - `[None, 2, 1]` and an all-`None` row.
    fn failures_are_undefined() {
        let metric = array![[1.0, 4.0, 2.0], [1.0, 1.0, 1.0]];
        let status = array![[FAIL, OK, OK], [FAIL, FAIL, FAIL]];
        let r = ratio(metric.view(), status.view()).unwrap();
        assert_eq!(r.row(0).to_vec(), vec![None, Some(2.0), Some(1.0)]);
        assert!(r.row(1).iter().all(Option::is_none));
    }

    #[test]
    // Purpose
    // -------
    // A non-positive metric on a successful run is rejected; on a failed
    // run it is ignored.
    //
    // Given
    // -----
    // - A zero metric with status converged, then with status failed.
    //
    // Expect
    // ------
    // - `NonPositiveMetric { problem: 0, solver: 1, .. }`, then `Ok`.
    fn non_positive_metric_is_rejected_only_on_success() {
        let metric = array![[1.0, 0.0]];
        let err = ratio(metric.view(), array![[OK, OK]].view()).unwrap_err();
        assert!(matches!(err, ProfileError::NonPositiveMetric { problem: 0, solver: 1, .. }));
        assert!(ratio(metric.view(), array![[OK, FAIL]].view()).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Curves are non-decreasing, start above 0, end at most 1, and have no
    // more steps than defined ratios.
    //
    // Given
    // -----
    // - Ratios `[1, 2, None, 1, 1.5]` over 5 problems.
    //
    // Expect
    // ------
    // - Points `(1, 0.4)`, `(1.5, 0.6)`, `(2, 0.8)`.
    fn profile_counts_undefined_in_denominator() {
        // Arrange
        let ratios = array![Some(1.0), Some(2.0), None, Some(1.0), Some(1.5)];

        // Act
        let curve = profile(ratios.view());

        // Assert
        let pts = curve.points();
        assert_eq!(pts.len(), 3);
        assert_relative_eq!(pts[0].tau, 1.0);
        assert_relative_eq!(pts[0].probability, 0.4);
        assert_relative_eq!(pts[1].probability, 0.6);
        assert_relative_eq!(pts[2].tau, 2.0);
        assert_relative_eq!(pts[2].probability, 0.8);
        assert!(pts.windows(2).all(|w| w[0].tau < w[1].tau && w[0].probability <= w[1].probability));
        assert_eq!(curve.probability_at(0.5), 0.0);
        assert_relative_eq!(curve.probability_at(1.7), 0.6);
        assert!(profile(array![None::<f64>, None].view()).is_empty());
    }

    #[test]
    // Purpose
    // -------
    // The builder compares the requested columns and can restrict to
    // problems where a cubic step happened.
    //
    // Given
    // -----
    // - 3 problems × 3 solvers; solver 2 invoked cubic steps on problem 1
    //   only.
    //
    // Expect
    // ------
    // - `pairwise` yields 3 pairs; the restricted pair has `n_problems = 1`;
    //   bad indices are rejected.
    fn builder_selects_pairs_and_cubic_subset() {
        // Arrange
        let data = PerformanceData::new(
            vec!["cg".into(), "admm".into(), "cg-cubic".into()],
            array![[1.0, 2.0, 1.5], [3.0, 1.0, 2.0], [1.0, 1.0, 1.0]],
            array![[10.0, 20.0, 12.0], [30.0, 9.0, 8.0], [5.0, 6.0, 5.0]],
            array![[OK, OK, OK], [FAIL, OK, OK], [OK, OK, OK]],
            array![[false, false, false], [false, false, true], [false, false, false]],
        )
        .unwrap();
        let builder = PerformanceProfileBuilder::new(&data);

        // Act
        let all = builder.pairwise(Metric::Time).unwrap();
        let pair = builder.pair(0, 1, Metric::Iterations).unwrap();
        let cubic = builder.pair_where_cubic_invoked(0, 2, Metric::Iterations, 2).unwrap();

        // Assert
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].solvers, (1, 2));
        assert_eq!(pair.names, ("cg".to_string(), "admm".to_string()));
        assert_eq!(pair.n_problems, 3);
        assert_relative_eq!(pair.first.probability_at(f64::INFINITY), 2.0 / 3.0);
        assert_eq!(cubic.n_problems, 1);
        assert!(cubic.first.is_empty());
        assert_eq!(cubic.second.points(), &[ProfilePoint { tau: 1.0, probability: 1.0 }]);
        assert!(matches!(builder.pair(0, 3, Metric::Time), Err(ProfileError::UnknownSolver { .. })));
        assert!(matches!(builder.pair(1, 1, Metric::Time), Err(ProfileError::SamePair { .. })));
    }
}
