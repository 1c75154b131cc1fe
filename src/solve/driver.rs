//! The solver invocation adapter: resolves the backend, builds the instance,
//! binds data, and runs the engine under the requested time budget.

use tracing::debug;

use crate::error::Result;
use crate::solve::engine::{ConstraintEngine, EngineOutcome};
use crate::solve::request::SolveRequest;

/// Drives `engine` through one full invocation for `request`.
///
/// Every step propagates failures as [`Error`](crate::error::Error); the
/// result normalizer is the layer that absorbs them. A timeout-triggered stop
/// is not a failure: the engine returns whatever it found before the stop.
pub fn run<E: ConstraintEngine>(engine: &E, request: &SolveRequest) -> Result<EngineOutcome> {
    request.validate()?;

    let backend = engine.lookup(&request.solver)?;
    debug!(solver = %request.solver, "resolved solver backend");

    let mut instance = engine.instance(&backend, &request.model)?;
    if let Some(data) = &request.data {
        for (name, value) in data {
            engine.bind(&mut instance, name, value)?;
        }
        debug!(parameters = data.len(), "bound model parameters");
    }

    engine.solve(instance, request.mode(), request.time_limit())
}
