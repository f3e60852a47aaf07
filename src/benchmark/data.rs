//! benchmark::data — per-problem, per-solver benchmark matrices.
//!
//! Purpose
//! -------
//! Hold the outcome of running several solvers on the same set of problems
//! in the layout the performance-profile builder consumes: one row per
//! problem, one column per solver.
//!
//! Key behaviors
//! -------------
//! - [`PerformanceData::new`] validates that every matrix has shape
//!   `(n_problems, n_solvers)`.
//! - [`PerformanceData::from_samples`] assembles the matrices from rows of
//!   [`PerformanceSample`]s, as produced by the batch harness.
//! - JSON persistence through `serde_json` (string and file forms).
//!
//! Conventions
//! -----------
//! - Iteration counts are stored as `f64` so that both metrics share one
//!   ratio code path.
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{
    benchmark::errors::{ProfileError, ProfileResult},
    optimization::cg_solver::{RunHistory, SolveStatus},
};

/// Which cost measure a profile compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Time,
    Iterations,
}

/// Summary of one solve used for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub elapsed_secs: f64,
    pub iterations: usize,
    pub status: SolveStatus,
    pub cubic_invoked: bool,
}

impl From<&RunHistory> for PerformanceSample {
    fn from(history: &RunHistory) -> Self {
        Self {
            elapsed_secs: history.elapsed_secs,
            iterations: history.iterations,
            status: history.status,
            cubic_invoked: history.cubic_invoked,
        }
    }
}

/// Benchmark matrices indexed `[problem, solver]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceData {
    solver_names: Vec<String>,
    time: Array2<f64>,
    iterations: Array2<f64>,
    status: Array2<SolveStatus>,
    cubic_invoked: Array2<bool>,
}

impl PerformanceData {
    /// Build from explicit matrices.
    ///
    /// # Errors
    /// [`ProfileError::ShapeMismatch`] if any matrix is not
    /// `(time.nrows(), solver_names.len())`.
    pub fn new(
        solver_names: Vec<String>, time: Array2<f64>, iterations: Array2<f64>,
        status: Array2<SolveStatus>, cubic_invoked: Array2<bool>,
    ) -> ProfileResult<Self> {
        let expected = (time.nrows(), solver_names.len());
        check_shape("time", expected, time.dim())?;
        check_shape("iterations", expected, iterations.dim())?;
        check_shape("status", expected, status.dim())?;
        check_shape("cubic_invoked", expected, cubic_invoked.dim())?;
        Ok(Self { solver_names, time, iterations, status, cubic_invoked })
    }

    /// Build from one row of samples per problem.
    ///
    /// # Errors
    /// [`ProfileError::ShapeMismatch`] if a row does not hold one sample per
    /// solver.
    pub fn from_samples(
        solver_names: Vec<String>, rows: &[Vec<PerformanceSample>],
    ) -> ProfileResult<Self> {
        let shape = (rows.len(), solver_names.len());
        let mut time = Array2::zeros(shape);
        let mut iterations = Array2::zeros(shape);
        let mut status = Array2::from_elem(shape, SolveStatus::Converged);
        let mut cubic_invoked = Array2::from_elem(shape, false);
        for (p, row) in rows.iter().enumerate() {
            if row.len() != shape.1 {
                return Err(ProfileError::ShapeMismatch {
                    what: "sample row",
                    expected: (1, shape.1),
                    found: (1, row.len()),
                });
            }
            for (s, sample) in row.iter().enumerate() {
                time[[p, s]] = sample.elapsed_secs;
                iterations[[p, s]] = sample.iterations as f64;
                status[[p, s]] = sample.status;
                cubic_invoked[[p, s]] = sample.cubic_invoked;
            }
        }
        Ok(Self { solver_names, time, iterations, status, cubic_invoked })
    }

    pub fn n_problems(&self) -> usize {
        self.time.nrows()
    }

    pub fn n_solvers(&self) -> usize {
        self.solver_names.len()
    }

    pub fn solver_names(&self) -> &[String] {
        &self.solver_names
    }

    pub fn metric(&self, metric: Metric) -> ArrayView2<'_, f64> {
        match metric {
            Metric::Time => self.time.view(),
            Metric::Iterations => self.iterations.view(),
        }
    }

    pub fn status(&self) -> ArrayView2<'_, SolveStatus> {
        self.status.view()
    }

    pub fn cubic_invoked(&self) -> ArrayView2<'_, bool> {
        self.cubic_invoked.view()
    }

    /// Verify that `index` names a solver column.
    pub fn check_solver(&self, index: usize) -> ProfileResult<()> {
        if index >= self.n_solvers() {
            return Err(ProfileError::UnknownSolver { index, n_solvers: self.n_solvers() });
        }
        Ok(())
    }

    pub fn to_json(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and re-validate shapes.
    pub fn from_json(text: &str) -> ProfileResult<Self> {
        let raw: Self = serde_json::from_str(text)?;
        Self::new(raw.solver_names, raw.time, raw.iterations, raw.status, raw.cubic_invoked)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ProfileResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> ProfileResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let raw: Self = serde_json::from_reader(reader)?;
        Self::new(raw.solver_names, raw.time, raw.iterations, raw.status, raw.cubic_invoked)
    }
}

fn check_shape(
    what: &'static str, expected: (usize, usize), found: (usize, usize),
) -> ProfileResult<()> {
    if expected != found {
        return Err(ProfileError::ShapeMismatch { what, expected, found });
    }
    Ok(())
}
