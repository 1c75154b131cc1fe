//! The request describing one constraint problem to solve.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::solve::engine::SearchMode;

fn default_solver() -> String {
    "gecode".to_owned()
}

/// A constraint satisfaction or optimization problem to hand to the engine.
///
/// The `model` text is opaque to this layer: it is passed to the engine
/// verbatim and never parsed or validated here. `data` entries are bound as
/// named parameters of the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// MiniZinc model source text.
    pub model: String,
    /// Named parameter bindings, applied to the instance one by one.
    #[serde(default)]
    pub data: Option<BTreeMap<String, Value>>,
    /// Identifier of the solver backend to use.
    #[serde(default = "default_solver")]
    pub solver: String,
    /// Request exhaustive enumeration instead of a single solution.
    #[serde(default)]
    pub all_solutions: bool,
    /// Wall-clock budget in whole seconds. Must be positive when present.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl SolveRequest {
    /// A request for `model` with the default solver, single-solution mode,
    /// and no time budget.
    pub fn new(model: impl Into<String>) -> Self {
        SolveRequest {
            model: model.into(),
            data: None,
            solver: default_solver(),
            all_solutions: false,
            timeout: None,
        }
    }

    /// Checks the request invariants that the engine cannot.
    pub fn validate(&self) -> Result<()> {
        if self.timeout == Some(0) {
            return Err(
                EngineError::InvalidRequest("timeout must be a positive duration".to_owned())
                    .into(),
            );
        }
        Ok(())
    }

    /// The wall-clock budget as a duration, when one was requested.
    pub fn time_limit(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// The search mode implied by `all_solutions`.
    pub fn mode(&self) -> SearchMode {
        if self.all_solutions {
            SearchMode::AllSolutions
        } else {
            SearchMode::SingleSolution
        }
    }
}
