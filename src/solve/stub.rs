//! An in-memory [`ConstraintEngine`] with scripted behaviour.
//!
//! Used by the crate's own tests, doctests, and benches: a stub can replay a
//! fixed outcome, fail at the solve step, or enumerate solutions at a fixed
//! pace until the time budget elapses. The paced mode exercises the
//! partial-results-preserved timeout contract without a real solver
//! installed.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::{json, Value};

use crate::error::{EngineError, Result};
use crate::solve::engine::{ConstraintEngine, EngineOutcome, SearchMode, SolutionRecord};
use crate::solve::stats::{StatValue, Statistics, SOLVE_TIME_KEY};
use crate::solve::status::EngineStatus;

/// What the stub should do when its solve step runs.
#[derive(Debug, Clone)]
pub enum StubScript {
    /// Return this outcome as-is.
    Outcome(EngineOutcome),
    /// Fail with this engine error.
    Fail(EngineError),
    /// Emit one `x = n` solution every `interval` until `total` solutions
    /// exist or the time budget elapses, whichever comes first.
    Paced { interval: Duration, total: usize },
}

/// The model and bindings the stub saw, captured for assertions.
#[derive(Debug, Clone)]
pub struct SeenInvocation {
    pub model: String,
    pub bindings: BTreeMap<String, Value>,
    pub mode: Option<SearchMode>,
    pub time_limit: Option<Duration>,
}

/// A scripted in-memory engine.
pub struct StubEngine {
    solvers: Vec<String>,
    script: StubScript,
    seen: Mutex<Option<SeenInvocation>>,
}

/// The stub's instance: the model text plus accumulated bindings.
#[derive(Debug)]
pub struct StubInstance {
    model: String,
    bindings: BTreeMap<String, Value>,
}

impl StubEngine {
    /// A stub that recognizes the given solver identifiers and runs `script`.
    pub fn new<I, S>(solvers: I, script: StubScript) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StubEngine {
            solvers: solvers.into_iter().map(Into::into).collect(),
            script,
            seen: Mutex::new(None),
        }
    }

    /// The last invocation that reached the solve step, if any.
    pub fn last_instance(&self) -> Option<SeenInvocation> {
        self.seen.lock().ok().and_then(|seen| seen.clone())
    }

    fn paced_outcome(
        interval: Duration,
        total: usize,
        mode: SearchMode,
        time_limit: Option<Duration>,
    ) -> EngineOutcome {
        let started = Instant::now();
        let wanted = match mode {
            SearchMode::SingleSolution => 1,
            SearchMode::AllSolutions => total,
        };

        let mut solutions = Vec::new();
        let mut exhausted = true;
        for n in 0..wanted {
            std::thread::sleep(interval);
            if let Some(budget) = time_limit {
                if started.elapsed() >= budget {
                    exhausted = false;
                    break;
                }
            }
            solutions.push(SolutionRecord {
                assignments: [("x".to_owned(), json!(n as i64 + 1))].into_iter().collect(),
                objective: None,
            });
        }

        let status = match (exhausted, mode, solutions.is_empty()) {
            (_, _, true) => EngineStatus::Unknown,
            (true, SearchMode::AllSolutions, false) => EngineStatus::AllSolutions,
            // A budget-triggered stop: solutions found, no exhaustion proof.
            _ => EngineStatus::Satisfied,
        };

        let mut statistics = Statistics::new();
        statistics.insert(
            SOLVE_TIME_KEY.to_owned(),
            StatValue::Duration(started.elapsed()),
        );
        EngineOutcome {
            status,
            solutions,
            statistics,
        }
    }
}

impl ConstraintEngine for StubEngine {
    type Backend = String;
    type Instance = StubInstance;

    fn lookup(&self, solver: &str) -> Result<Self::Backend> {
        if self.solvers.iter().any(|known| known == solver) {
            Ok(solver.to_owned())
        } else {
            Err(EngineError::BackendNotFound(solver.to_owned()).into())
        }
    }

    fn instance(&self, _backend: &Self::Backend, model: &str) -> Result<Self::Instance> {
        Ok(StubInstance {
            model: model.to_owned(),
            bindings: BTreeMap::new(),
        })
    }

    fn bind(&self, instance: &mut Self::Instance, name: &str, value: &Value) -> Result<()> {
        if instance.bindings.insert(name.to_owned(), value.clone()).is_some() {
            return Err(EngineError::Binding {
                name: name.to_owned(),
                reason: "parameter already bound".to_owned(),
            }
            .into());
        }
        Ok(())
    }

    fn solve(
        &self,
        instance: Self::Instance,
        mode: SearchMode,
        time_limit: Option<Duration>,
    ) -> Result<EngineOutcome> {
        if let Ok(mut seen) = self.seen.lock() {
            *seen = Some(SeenInvocation {
                model: instance.model,
                bindings: instance.bindings,
                mode: Some(mode),
                time_limit,
            });
        }
        match &self.script {
            StubScript::Outcome(outcome) => Ok(outcome.clone()),
            StubScript::Fail(error) => Err(error.clone().into()),
            StubScript::Paced { interval, total } => {
                Ok(Self::paced_outcome(*interval, *total, mode, time_limit))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn paced_enumeration_stops_on_the_budget_and_keeps_partials() {
        let outcome = StubEngine::paced_outcome(
            Duration::from_millis(10),
            10_000,
            SearchMode::AllSolutions,
            Some(Duration::from_millis(80)),
        );
        assert!(!outcome.solutions.is_empty());
        assert!(outcome.solutions.len() < 10_000);
        assert_eq!(outcome.status, EngineStatus::Satisfied);
    }

    #[test]
    fn paced_enumeration_exhausts_small_spaces() {
        let outcome = StubEngine::paced_outcome(
            Duration::from_millis(1),
            5,
            SearchMode::AllSolutions,
            None,
        );
        assert_eq!(outcome.solutions.len(), 5);
        assert_eq!(outcome.status, EngineStatus::AllSolutions);
    }

    #[test]
    fn paced_single_mode_stops_after_the_first_solution() {
        let outcome = StubEngine::paced_outcome(
            Duration::from_millis(1),
            5,
            SearchMode::SingleSolution,
            None,
        );
        assert_eq!(outcome.solutions.len(), 1);
        assert_eq!(outcome.status, EngineStatus::Satisfied);
    }

    #[test]
    fn duplicate_binding_is_rejected() {
        let engine = StubEngine::new(
            ["gecode"],
            StubScript::Outcome(EngineOutcome::bare(EngineStatus::Satisfied)),
        );
        let backend = engine.lookup("gecode").unwrap();
        let mut instance = engine.instance(&backend, "solve satisfy;").unwrap();
        engine.bind(&mut instance, "n", &json!(1)).unwrap();
        assert!(engine.bind(&mut instance, "n", &json!(2)).is_err());
    }
}
