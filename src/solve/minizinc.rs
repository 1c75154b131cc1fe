//! A [`ConstraintEngine`] backed by the `minizinc` executable.
//!
//! The binary is driven in `--json-stream` mode: every line of output is a
//! JSON record (`solution`, `status`, `statistics`, `error`, `warning`),
//! which this module parses into an [`EngineOutcome`]. The time budget is
//! passed as `--time-limit`; MiniZinc flushes solutions as it finds them, so
//! a budget-triggered stop still yields everything discovered up to that
//! point.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::solve::engine::{ConstraintEngine, EngineOutcome, SearchMode, SolutionRecord};
use crate::solve::stats::{StatValue, Statistics};
use crate::solve::status::EngineStatus;

/// One entry of the installed-solver catalogue (`minizinc --solvers-json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSpec {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Configuration for [`MiniZincCli`].
#[derive(Debug, Clone, Default)]
pub struct MiniZincConfig {
    /// Explicit path to the `minizinc` binary; discovered on `PATH` when
    /// absent.
    pub binary: Option<PathBuf>,
}

/// The subprocess-backed MiniZinc engine.
#[derive(Debug, Clone, Default)]
pub struct MiniZincCli {
    config: MiniZincConfig,
}

/// A resolved backend: the binary plus the catalogue id of the solver.
#[derive(Debug, Clone)]
pub struct MiniZincBackend {
    binary: PathBuf,
    solver_id: String,
}

/// A model written to disk, with its data bindings accumulated in memory
/// until the solve step serializes them as MiniZinc JSON data.
#[derive(Debug)]
pub struct MiniZincInstance {
    dir: TempDir,
    model_path: PathBuf,
    backend: MiniZincBackend,
    data: serde_json::Map<String, Value>,
}

impl MiniZincCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MiniZincConfig) -> Self {
        MiniZincCli { config }
    }

    fn locate(&self) -> Result<PathBuf, EngineError> {
        self.config
            .binary
            .clone()
            .or_else(|| which::which("minizinc").ok())
            .ok_or_else(|| {
                EngineError::Execution(
                    "minizinc executable not found; install MiniZinc or set an explicit binary path"
                        .to_owned(),
                )
            })
    }

    /// The catalogue of installed solver backends.
    pub fn solvers(&self) -> Result<Vec<SolverSpec>> {
        let binary = self.locate()?;
        Ok(Self::catalogue_of(&binary)?)
    }

    fn catalogue_of(binary: &std::path::Path) -> Result<Vec<SolverSpec>, EngineError> {
        let output = Command::new(binary)
            .arg("--solvers-json")
            .output()
            .map_err(|e| EngineError::Execution(format!("failed to run minizinc: {e}")))?;
        parse_solver_catalogue(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Matches a requested solver identifier against a catalogue entry the way
/// MiniZinc itself does: exact id, last id segment, name, or tag.
fn resolve_solver<'a>(catalogue: &'a [SolverSpec], key: &str) -> Option<&'a SolverSpec> {
    catalogue.iter().find(|entry| {
        entry.id == key
            || entry.id.rsplit('.').next() == Some(key)
            || entry.name.eq_ignore_ascii_case(key)
            || entry.tags.iter().any(|tag| tag == key)
    })
}

fn parse_solver_catalogue(text: &str) -> Result<Vec<SolverSpec>, EngineError> {
    serde_json::from_str(text)
        .map_err(|e| EngineError::Execution(format!("malformed solver catalogue: {e}")))
}

impl ConstraintEngine for MiniZincCli {
    type Backend = MiniZincBackend;
    type Instance = MiniZincInstance;

    fn lookup(&self, solver: &str) -> Result<Self::Backend> {
        let binary = self.locate()?;
        let catalogue = Self::catalogue_of(&binary)?;
        let entry = resolve_solver(&catalogue, solver)
            .ok_or_else(|| EngineError::BackendNotFound(solver.to_owned()))?;
        debug!(solver = %entry.id, version = %entry.version, "resolved minizinc backend");
        Ok(MiniZincBackend {
            binary,
            solver_id: entry.id.clone(),
        })
    }

    fn instance(&self, backend: &Self::Backend, model: &str) -> Result<Self::Instance> {
        let dir = TempDir::new()
            .map_err(|e| EngineError::Instance(format!("cannot create working directory: {e}")))?;
        let model_path = dir.path().join("model.mzn");
        std::fs::write(&model_path, model)
            .map_err(|e| EngineError::Instance(format!("cannot write model file: {e}")))?;
        Ok(MiniZincInstance {
            dir,
            model_path,
            backend: backend.clone(),
            data: serde_json::Map::new(),
        })
    }

    fn bind(&self, instance: &mut Self::Instance, name: &str, value: &Value) -> Result<()> {
        if instance.data.insert(name.to_owned(), value.clone()).is_some() {
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
        let mut command = Command::new(&instance.backend.binary);
        command
            .arg("--solver")
            .arg(&instance.backend.solver_id)
            .arg("--json-stream")
            .arg("--output-mode")
            .arg("json")
            .arg("--output-objective")
            .arg("--statistics");
        if mode == SearchMode::AllSolutions {
            command.arg("--all-solutions");
        }
        if let Some(budget) = time_limit {
            command.arg("--time-limit").arg(budget.as_millis().to_string());
        }
        command.arg(&instance.model_path);

        if !instance.data.is_empty() {
            let data_path = instance.dir.path().join("data.json");
            let payload = serde_json::to_string(&Value::Object(instance.data.clone()))
                .map_err(|e| EngineError::Execution(format!("cannot serialize data: {e}")))?;
            std::fs::write(&data_path, payload)
                .map_err(|e| EngineError::Execution(format!("cannot write data file: {e}")))?;
            command.arg(&data_path);
        }

        debug!(solver = %instance.backend.solver_id, ?mode, ?time_limit, "invoking minizinc");
        let output = command
            .output()
            .map_err(|e| EngineError::Execution(format!("failed to run minizinc: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let outcome = parse_stream(&stdout)?;

        if !output.status.success() {
            let message = find_error_message(&stderr)
                .or_else(|| find_error_message(&stdout))
                .unwrap_or_else(|| {
                    format!("minizinc exited with {}: {}", output.status, stderr.trim())
                });
            return Err(EngineError::Execution(message).into());
        }
        Ok(outcome)
    }
}

/// One record of the `--json-stream` protocol. Unknown record types are
/// skipped rather than rejected.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StreamMessage {
    Solution {
        output: SolutionOutput,
    },
    Status {
        status: String,
    },
    Statistics {
        statistics: serde_json::Map<String, Value>,
    },
    Error {
        #[serde(default)]
        message: String,
    },
    Warning {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct SolutionOutput {
    #[serde(default)]
    json: serde_json::Map<String, Value>,
}

/// Parses a full `--json-stream` transcript into an [`EngineOutcome`].
///
/// An `error` record, or an engine-reported `ERROR` status, aborts the parse
/// with an execution failure; both belong on the error channel, not in the
/// status pass-through. Lines that are not JSON records (solver banner noise)
/// are ignored.
fn parse_stream(stdout: &str) -> Result<EngineOutcome, EngineError> {
    let mut status: Option<EngineStatus> = None;
    let mut solutions: Vec<SolutionRecord> = Vec::new();
    let mut statistics = Statistics::new();

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let message: StreamMessage = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(_) => {
                debug!(line, "skipping non-record output line");
                continue;
            }
        };
        match message {
            StreamMessage::Solution { output } => {
                let assignments: BTreeMap<String, Value> = output.json.into_iter().collect();
                let objective = assignments.get("_objective").and_then(Value::as_f64);
                solutions.push(SolutionRecord {
                    assignments,
                    objective,
                });
            }
            StreamMessage::Status { status: name } => {
                if name == "ERROR" {
                    return Err(EngineError::Execution(
                        "engine reported an error status".to_owned(),
                    ));
                }
                status = Some(EngineStatus::parse(&name));
            }
            StreamMessage::Statistics { statistics: entries } => {
                for (key, value) in entries {
                    let stat = match value {
                        Value::Number(n) => match n.as_f64() {
                            Some(number) => StatValue::Number(number),
                            None => StatValue::Text(n.to_string()),
                        },
                        Value::String(text) => StatValue::Text(text),
                        other => StatValue::Text(other.to_string()),
                    };
                    statistics.insert(key, stat);
                }
            }
            StreamMessage::Error { message } => {
                return Err(EngineError::Execution(if message.is_empty() {
                    "minizinc reported an error".to_owned()
                } else {
                    message
                }));
            }
            StreamMessage::Warning { message } => {
                warn!(%message, "minizinc warning");
            }
            StreamMessage::Other => {}
        }
    }

    // A satisfy run that stops after its first solution ends the stream
    // without a status record.
    let status = status.unwrap_or(if solutions.is_empty() {
        EngineStatus::Unknown
    } else {
        EngineStatus::Satisfied
    });
    Ok(EngineOutcome {
        status,
        solutions,
        statistics,
    })
}

/// The message of the first `error` record in `text`, if any.
fn find_error_message(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        match serde_json::from_str::<StreamMessage>(line.trim()) {
            Ok(StreamMessage::Error { message }) if !message.is_empty() => Some(message),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    // --- Test Setup ---

    fn catalogue() -> Vec<SolverSpec> {
        vec![
            SolverSpec {
                id: "org.gecode.gecode".to_owned(),
                name: "Gecode".to_owned(),
                version: "6.3.0".to_owned(),
                tags: vec!["cp".to_owned(), "int".to_owned()],
            },
            SolverSpec {
                id: "org.chuffed.chuffed".to_owned(),
                name: "Chuffed".to_owned(),
                version: "0.13.2".to_owned(),
                tags: vec!["cp".to_owned(), "lcg".to_owned()],
            },
        ]
    }

    // --- Tests ---

    #[test]
    fn resolves_by_id_segment_name_and_tag() {
        let catalogue = catalogue();
        assert_eq!(
            resolve_solver(&catalogue, "gecode").map(|s| s.id.as_str()),
            Some("org.gecode.gecode")
        );
        assert_eq!(
            resolve_solver(&catalogue, "org.chuffed.chuffed").map(|s| s.id.as_str()),
            Some("org.chuffed.chuffed")
        );
        assert_eq!(
            resolve_solver(&catalogue, "Chuffed").map(|s| s.id.as_str()),
            Some("org.chuffed.chuffed")
        );
        assert_eq!(
            resolve_solver(&catalogue, "lcg").map(|s| s.id.as_str()),
            Some("org.chuffed.chuffed")
        );
        assert_eq!(resolve_solver(&catalogue, "cplex"), None);
    }

    #[test]
    fn parses_a_single_satisfy_transcript() {
        let transcript = r#"
{"type": "solution", "output": {"json": {"x": 1}}, "sections": ["json"]}
{"type": "statistics", "statistics": {"solveTime": 0.002, "solutions": 1}}
"#;
        let outcome = parse_stream(transcript).unwrap();
        assert_eq!(outcome.status, EngineStatus::Satisfied);
        assert_eq!(outcome.solutions.len(), 1);
        assert_eq!(outcome.solutions[0].assignments["x"], json!(1));
        assert_eq!(
            outcome.statistics.get("solveTime"),
            Some(&StatValue::Number(0.002))
        );
    }

    #[test]
    fn parses_an_enumeration_transcript_in_order() {
        let transcript = r#"
{"type": "solution", "output": {"json": {"x": 1}}}
{"type": "solution", "output": {"json": {"x": 2}}}
{"type": "solution", "output": {"json": {"x": 3}}}
{"type": "status", "status": "ALL_SOLUTIONS"}
"#;
        let outcome = parse_stream(transcript).unwrap();
        assert_eq!(outcome.status, EngineStatus::AllSolutions);
        let xs: Vec<_> = outcome
            .solutions
            .iter()
            .map(|record| record.assignments["x"].clone())
            .collect();
        assert_eq!(xs, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn parses_an_optimization_transcript_with_objective() {
        let transcript = r#"
{"type": "solution", "output": {"json": {"x": 5, "_objective": 5}}}
{"type": "solution", "output": {"json": {"x": 9, "_objective": 9}}}
{"type": "status", "status": "OPTIMAL_SOLUTION"}
"#;
        let outcome = parse_stream(transcript).unwrap();
        assert_eq!(outcome.status, EngineStatus::OptimalSolution);
        assert_eq!(outcome.solutions.last().unwrap().objective, Some(9.0));
    }

    #[test]
    fn unsatisfiable_transcript_has_no_solutions() {
        let transcript = r#"{"type": "status", "status": "UNSATISFIABLE"}"#;
        let outcome = parse_stream(transcript).unwrap();
        assert_eq!(outcome.status, EngineStatus::Unsatisfiable);
        assert!(outcome.solutions.is_empty());
    }

    #[test]
    fn empty_transcript_degrades_to_unknown() {
        let outcome = parse_stream("").unwrap();
        assert_eq!(outcome.status, EngineStatus::Unknown);
        assert!(outcome.solutions.is_empty());
    }

    #[test]
    fn error_records_abort_the_parse() {
        let transcript = r#"
{"type": "error", "what": "type error", "message": "undefined identifier `queens'"}
"#;
        let error = parse_stream(transcript).unwrap_err();
        assert!(error.to_string().contains("undefined identifier"));
    }

    #[test]
    fn engine_error_status_goes_to_the_error_channel() {
        let transcript = r#"{"type": "status", "status": "ERROR"}"#;
        assert!(parse_stream(transcript).is_err());
    }

    #[test]
    fn noise_lines_and_unknown_records_are_skipped() {
        let transcript = r#"
% solver banner
{"type": "comment", "comment": "restart"}
{"type": "solution", "output": {"json": {"x": 4}}}
"#;
        let outcome = parse_stream(transcript).unwrap();
        assert_eq!(outcome.solutions.len(), 1);
        assert_eq!(outcome.status, EngineStatus::Satisfied);
    }

    #[test]
    fn warning_records_do_not_affect_the_outcome() {
        let transcript = r#"
{"type": "warning", "message": "model inconsistency detected"}
{"type": "status", "status": "UNSATISFIABLE"}
"#;
        let outcome = parse_stream(transcript).unwrap();
        assert_eq!(outcome.status, EngineStatus::Unsatisfiable);
    }

    #[test]
    fn parses_the_solver_catalogue() {
        let text = r#"[
            {"id": "org.gecode.gecode", "name": "Gecode", "version": "6.3.0",
             "tags": ["cp"], "extraFlags": []}
        ]"#;
        let catalogue = parse_solver_catalogue(text).unwrap();
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue[0].name, "Gecode");
    }

    #[test]
    fn stderr_error_records_are_surfaced() {
        let stderr = r#"{"type": "error", "message": "no solver backend"}"#;
        assert_eq!(
            find_error_message(stderr),
            Some("no solver backend".to_owned())
        );
        assert_eq!(find_error_message("plain noise"), None);
    }
}
