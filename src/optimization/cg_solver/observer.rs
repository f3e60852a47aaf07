//! Per-iteration observation hooks for the CG solver.
//!
//! The runner hands every completed iteration to an [`IterationObserver`].
//! Closures implement the trait directly, so tests can collect records with
//! `|r: &IterationRecord| seen.push(r.clone())`. [`LogObserver`] forwards
//! records to the `log` facade at `debug` level and is attached when
//! `CgOptions::verbose` is set.
use crate::optimization::cg_solver::restart::RestartStage;

/// Snapshot of one completed iteration.
///
/// - `iteration`: 1-based iteration index.
/// - `objective`: full objective at the new iterate.
/// - `grad_norm`: `‖c‖₂` at the new iterate.
/// - `step`: accepted step length along the search direction.
/// - `stage`: restart stage that produced the direction.
/// - `cubic`: `true` if the step came from cubic regularization.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub objective: f64,
    pub grad_norm: f64,
    pub step: f64,
    pub stage: RestartStage,
    pub cubic: bool,
}

/// Receives one [`IterationRecord`] per completed iteration.
pub trait IterationObserver {
    fn observe(&mut self, record: &IterationRecord);
}

impl<F> IterationObserver for F
where
    F: FnMut(&IterationRecord),
{
    fn observe(&mut self, record: &IterationRecord) {
        self(record)
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl IterationObserver for NoopObserver {
    fn observe(&mut self, _record: &IterationRecord) {}
}

/// Logs every record at `debug` level, tagged with a solver label.
#[derive(Debug, Clone)]
pub struct LogObserver {
    label: String,
}

impl LogObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl IterationObserver for LogObserver {
    fn observe(&mut self, record: &IterationRecord) {
        log::debug!(
            "{}: iter {:>5} f = {:.8e} |c| = {:.4e} step = {:.4e} stage = {:?}{}",
            self.label,
            record.iteration,
            record.objective,
            record.grad_norm,
            record.step,
            record.stage,
            if record.cubic { " (cubic)" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Closures act as observers and see records in order.
    //
    // Given
    // -----
    // - Two records fed through a `FnMut` closure.
    //
    // Expect
    // ------
    // - The closure collects both iteration indices.
    fn closures_are_observers() {
        let mut seen = Vec::new();
        {
            let mut obs = |r: &IterationRecord| seen.push(r.iteration);
            for iteration in 1..=2 {
                obs.observe(&IterationRecord {
                    iteration,
                    objective: 1.0,
                    grad_norm: 0.5,
                    step: 0.1,
                    stage: RestartStage::SteepestDescent,
                    cubic: false,
                });
            }
        }
        assert_eq!(seen, vec![1, 2]);
    }
}
