//! End-to-end behaviour of the solve pipeline against scripted engines,
//! including the wall-clock timeout contract.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::json;

use mzn_bridge::solve::engine::{EngineOutcome, SolutionRecord};
use mzn_bridge::solve::normalize;
use mzn_bridge::solve::request::SolveRequest;
use mzn_bridge::solve::stats::{StatValue, Statistics, SOLVE_TIME_KEY};
use mzn_bridge::solve::status::EngineStatus;
use mzn_bridge::solve::stub::{StubEngine, StubScript};

fn satisfying_outcome() -> EngineOutcome {
    EngineOutcome {
        status: EngineStatus::Satisfied,
        solutions: vec![SolutionRecord {
            assignments: [("x".to_owned(), json!(1))].into_iter().collect(),
            objective: None,
        }],
        statistics: [(SOLVE_TIME_KEY.to_owned(), StatValue::Number(0.002))]
            .into_iter()
            .collect(),
    }
}

#[test]
fn simple_satisfy_without_timeout_completes() {
    let engine = StubEngine::new(["gecode"], StubScript::Outcome(satisfying_outcome()));
    let request = SolveRequest::new("var 1..10: x; solve satisfy;");

    let result = normalize::solve(&engine, &request);
    assert_ne!(result.status, "ERROR");
    assert!(result.num_solutions >= 1);
    assert_eq!(result.num_solutions, result.solutions.len());
    assert!(result.solve_time >= 0.0);
}

#[test]
fn simple_satisfy_with_timeout_returns_promptly() {
    let engine = StubEngine::new(
        ["gecode"],
        StubScript::Paced {
            interval: Duration::from_millis(5),
            total: 1,
        },
    );
    let request = SolveRequest {
        timeout: Some(1),
        ..SolveRequest::new("var 1..10: x; solve satisfy;")
    };

    let started = Instant::now();
    let result = normalize::solve(&engine, &request);
    let elapsed = started.elapsed();

    assert_ne!(result.status, "ERROR");
    assert!(result.num_solutions >= 1);
    // A trivial problem finishes well inside the one-second budget.
    assert!(elapsed < Duration::from_secs(1), "took {elapsed:?}");
}

#[test]
fn enumeration_is_cut_off_by_the_time_budget_with_partials_kept() {
    // A solution space that would take far longer than the budget to
    // enumerate fully: 10k solutions at 10ms apiece.
    let total = 10_000;
    let engine = StubEngine::new(
        ["gecode"],
        StubScript::Paced {
            interval: Duration::from_millis(10),
            total,
        },
    );
    let request = SolveRequest {
        all_solutions: true,
        timeout: Some(2),
        ..SolveRequest::new("solve satisfy;")
    };

    let started = Instant::now();
    let result = normalize::solve(&engine, &request);
    let elapsed = started.elapsed();

    // Wall clock stays near the 2s budget, not the minutes a full
    // enumeration would take.
    assert!(elapsed >= Duration::from_millis(1500), "took {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");

    assert_ne!(result.status, "ERROR");
    assert!(result.num_solutions > 0, "no partial solutions preserved");
    assert!(
        result.num_solutions < total,
        "budget did not interrupt the enumeration"
    );
    assert!(result.solve_time > 0.0);
}

#[test]
fn unresolvable_solver_identifier_yields_an_error_result() {
    let engine = StubEngine::new(["gecode"], StubScript::Outcome(satisfying_outcome()));
    let request = SolveRequest {
        solver: "does-not-exist".to_owned(),
        ..SolveRequest::new("var 1..10: x; solve satisfy;")
    };

    let result = normalize::solve(&engine, &request);
    assert_eq!(result.status, "ERROR");
    assert!(!result.error.clone().unwrap_or_default().is_empty());
    assert_eq!(result.num_solutions, 0);
    assert_eq!(result.solve_time, 0.0);
}

#[test]
fn enumeration_that_exhausts_the_space_reports_all_solutions() {
    let engine = StubEngine::new(
        ["gecode"],
        StubScript::Paced {
            interval: Duration::from_millis(1),
            total: 8,
        },
    );
    let request = SolveRequest {
        all_solutions: true,
        ..SolveRequest::new("solve satisfy;")
    };

    let result = normalize::solve(&engine, &request);
    assert_eq!(result.status, "ALL_SOLUTIONS");
    assert_eq!(result.num_solutions, 8);
    assert!(result.solutions.iter().all(|s| !s.is_optimal));
}

#[test]
fn results_serialize_to_the_stable_wire_shape() {
    let engine = StubEngine::new(["gecode"], StubScript::Outcome(satisfying_outcome()));
    let result = normalize::solve(&engine, &SolveRequest::new("var 1..10: x; solve satisfy;"));

    let wire = serde_json::to_value(&result).unwrap();
    assert_eq!(wire["status"], json!("SATISFIED"));
    assert_eq!(wire["num_solutions"], json!(1));
    assert_eq!(wire["solutions"][0]["variables"]["x"], json!(1));
    assert_eq!(wire["error"], json!(null));
}

#[test]
fn requests_deserialize_from_the_transport_payload() {
    let request: SolveRequest = serde_json::from_value(json!({
        "model": "int: n; var 1..n: x; solve satisfy;",
        "data": {"n": 4},
        "solver": "gecode",
        "all_solutions": true,
        "timeout": 2
    }))
    .unwrap();

    let engine = StubEngine::new(
        ["gecode"],
        StubScript::Outcome(EngineOutcome {
            status: EngineStatus::AllSolutions,
            solutions: (1..=4)
                .map(|x| SolutionRecord {
                    assignments: [("x".to_owned(), json!(x))].into_iter().collect(),
                    objective: None,
                })
                .collect(),
            statistics: Statistics::new(),
        }),
    );
    let result = normalize::solve(&engine, &request);
    assert_eq!(result.num_solutions, 4);
    assert_eq!(result.status, "ALL_SOLUTIONS");
}
