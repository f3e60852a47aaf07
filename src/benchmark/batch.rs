//! benchmark::batch — run every solver on every problem.
//!
//! Problems are distributed over the `rayon` thread pool; each problem's
//! solves run sequentially on one worker and write into that problem's own
//! row, so no mutable state is shared between workers. Rows come back in
//! problem order.
//!
//! A solver that returns `Err` (invalid configuration) aborts the batch. A
//! solve that merely fails numerically is recorded through its status.
use rayon::prelude::*;

use crate::{
    benchmark::{
        data::{PerformanceData, PerformanceSample},
        errors::{ProfileError, ProfileResult},
    },
    group_lasso::ProblemInstance,
    optimization::cg_solver::LassoSolver,
};

/// Run `solvers` on `problems` and collect the benchmark matrices.
///
/// # Errors
/// - [`ProfileError::NoSolvers`] for an empty solver list.
/// - [`ProfileError::Opt`] if any solver rejects its configuration.
pub fn run_batch(
    problems: &[ProblemInstance], solvers: &[&dyn LassoSolver],
) -> ProfileResult<PerformanceData> {
    if solvers.is_empty() {
        return Err(ProfileError::NoSolvers);
    }
    let names: Vec<String> = solvers.iter().map(|s| s.name().to_string()).collect();
    log::info!("benchmark batch: {} problems x {} solvers {:?}", problems.len(), names.len(), names);

    let rows = problems
        .par_iter()
        .map(|problem| {
            solvers
                .iter()
                .map(|solver| -> ProfileResult<PerformanceSample> {
                    let outcome = solver.solve(problem)?;
                    Ok(PerformanceSample::from(&outcome.history))
                })
                .collect::<ProfileResult<Vec<_>>>()
        })
        .collect::<ProfileResult<Vec<_>>>()?;

    let data = PerformanceData::from_samples(names, &rows)?;
    let solved = data.status().iter().filter(|s| s.is_success()).count();
    log::info!("benchmark batch finished: {solved}/{} solves converged", data.status().len());
    Ok(data)
}
