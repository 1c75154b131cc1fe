//! The boundary to the external constraint-solving engine.
//!
//! Everything on the far side of [`ConstraintEngine`] — model compilation,
//! propagation, search — is opaque to this crate. The trait exposes exactly
//! the four capabilities the solve pipeline needs: backend lookup, instance
//! construction, parameter binding, and a solve run under an optional time
//! budget.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::error::Result;
use crate::solve::stats::Statistics;
use crate::solve::status::EngineStatus;

/// How the engine should enumerate solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Stop at the first satisfying solution, or at the proven optimum when
    /// the model declares an objective.
    SingleSolution,
    /// Enumerate every solution, subject to the time budget.
    AllSolutions,
}

/// One raw solution as reported by the engine.
///
/// The engine hands back a plain name-to-value mapping rather than an object
/// needing introspection; names starting with `_` are engine-internal
/// bookkeeping and are filtered out during extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionRecord {
    /// Variable name to bound value, in the engine's own vocabulary.
    pub assignments: BTreeMap<String, Value>,
    /// The objective value, when the model declares one.
    pub objective: Option<f64>,
}

/// The raw outcome of one engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutcome {
    pub status: EngineStatus,
    /// Solution records in discovery order.
    pub solutions: Vec<SolutionRecord>,
    pub statistics: Statistics,
}

/// An external constraint-solving capability.
///
/// Implementations must treat a timeout-triggered stop as a successful,
/// possibly partial outcome: solutions discovered before the stop are
/// returned, never discarded, and the stop itself is not an error.
pub trait ConstraintEngine {
    /// A resolved solver backend handle.
    type Backend;
    /// A model combined with its bound data, ready to solve.
    type Instance;

    /// Resolves a solver identifier to a backend handle.
    fn lookup(&self, solver: &str) -> Result<Self::Backend>;

    /// Builds an instance from the model source text.
    fn instance(&self, backend: &Self::Backend, model: &str) -> Result<Self::Instance>;

    /// Binds one named parameter of the model.
    fn bind(&self, instance: &mut Self::Instance, name: &str, value: &Value) -> Result<()>;

    /// Runs the instance to completion or until `time_limit` elapses.
    fn solve(
        &self,
        instance: Self::Instance,
        mode: SearchMode,
        time_limit: Option<Duration>,
    ) -> Result<EngineOutcome>;
}

impl EngineOutcome {
    /// An outcome with the given status and no solutions or statistics.
    pub fn bare(status: EngineStatus) -> Self {
        EngineOutcome {
            status,
            solutions: Vec::new(),
            statistics: Statistics::new(),
        }
    }
}
