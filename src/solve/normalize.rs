//! The result normalizer: the single recovery boundary of the pipeline.
//!
//! Whatever happens on the engine side — an unknown backend, a binding
//! conflict, an execution fault — the caller receives a structurally valid
//! [`SolveResult`]. Failures surface as `status = "ERROR"` with a message,
//! never as a propagated error.

use tracing::{debug, warn};

use crate::solve::driver;
use crate::solve::engine::{ConstraintEngine, EngineOutcome};
use crate::solve::request::SolveRequest;
use crate::solve::solution::{Solution, SolveResult};
use crate::solve::stats;
use crate::solve::status::EngineStatus;

/// Solves `request` against `engine` and normalizes whatever comes back.
///
/// This function is infallible by contract: the two terminal outcomes are a
/// completed result (any non-`ERROR` status, possibly with zero solutions)
/// or an `ERROR` result carrying the failure message.
pub fn solve<E: ConstraintEngine>(engine: &E, request: &SolveRequest) -> SolveResult {
    match driver::run(engine, request) {
        Ok(outcome) => normalize(request, &outcome),
        Err(error) => {
            warn!(%error, "solve failed");
            debug!(backtrace = %error.backtrace(), "failure backtrace");
            SolveResult::failure(error.to_string())
        }
    }
}

fn normalize(request: &SolveRequest, outcome: &EngineOutcome) -> SolveResult {
    let solve_time = stats::solve_time_seconds(&outcome.statistics);

    let solutions = match &outcome.status {
        // Enumeration: every record, none of them claiming optimality, even
        // when the engine exhausted the space.
        EngineStatus::Satisfied | EngineStatus::AllSolutions if request.all_solutions => outcome
            .solutions
            .iter()
            .map(|record| Solution::from_record(record, false))
            .collect(),
        // Single-solution satisfy: the engine's final incumbent, not optimal.
        EngineStatus::Satisfied | EngineStatus::AllSolutions => outcome
            .solutions
            .last()
            .map(|record| Solution::from_record(record, false))
            .into_iter()
            .collect(),
        // Proven optimum: exactly one solution, the last incumbent. An
        // enumeration request never claims optimality, whatever the engine
        // says.
        EngineStatus::OptimalSolution => outcome
            .solutions
            .last()
            .map(|record| Solution::from_record(record, !request.all_solutions))
            .into_iter()
            .collect(),
        // No decision or no solution: pass the status through with nothing
        // attached. Not an error.
        _ => Vec::new(),
    };

    debug!(
        status = outcome.status.canonical(),
        solutions = solutions.len(),
        solve_time,
        "normalized engine outcome"
    );
    SolveResult::completed(solutions, outcome.status.canonical(), solve_time)
}
