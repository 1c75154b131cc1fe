//! mzn-bridge drives an external MiniZinc solver and normalizes its output
//! into a small, stable result schema.
//!
//! The crate does not solve constraints itself. It owns the layer between a
//! caller and a constraint-solving engine: it resolves a solver backend,
//! builds a model instance, binds data parameters, runs the solve under an
//! optional wall-clock budget, and maps the engine's heterogeneous output —
//! status codes, solution records, statistics — into a [`SolveResult`] the
//! caller can rely on structurally. The caller never observes an unhandled
//! failure: anything that goes wrong surfaces as `status = "ERROR"` with a
//! message.
//!
//! # Core Concepts
//!
//! - **[`SolveRequest`]**: the problem description — model text (opaque to
//!   this crate), optional data bindings, solver choice, enumeration mode,
//!   and time budget.
//! - **[`ConstraintEngine`]**: the boundary trait for the external engine.
//!   [`MiniZincCli`] implements it over the `minizinc` executable; the
//!   [`StubEngine`] is an in-memory scripted implementation for tests.
//! - **[`normalize::solve`]**: the single entry point and the single
//!   recovery boundary. It is infallible: every call produces a
//!   [`SolveResult`].
//!
//! # Example
//!
//! ```
//! use mzn_bridge::solve::engine::{EngineOutcome, SolutionRecord};
//! use mzn_bridge::solve::normalize;
//! use mzn_bridge::solve::request::SolveRequest;
//! use mzn_bridge::solve::status::EngineStatus;
//! use mzn_bridge::solve::stats::Statistics;
//! use mzn_bridge::solve::stub::{StubEngine, StubScript};
//! use serde_json::json;
//!
//! // A scripted engine standing in for a real MiniZinc installation.
//! let outcome = EngineOutcome {
//!     status: EngineStatus::Satisfied,
//!     solutions: vec![SolutionRecord {
//!         assignments: [("x".to_owned(), json!(1))].into_iter().collect(),
//!         objective: None,
//!     }],
//!     statistics: Statistics::new(),
//! };
//! let engine = StubEngine::new(["gecode"], StubScript::Outcome(outcome));
//!
//! let request = SolveRequest::new("var 1..10: x; solve satisfy;");
//! let result = normalize::solve(&engine, &request);
//!
//! assert_eq!(result.status, "SATISFIED");
//! assert_eq!(result.num_solutions, 1);
//! assert_eq!(result.solutions[0].variables["x"], json!(1));
//! assert_eq!(result.error, None);
//! ```
//!
//! [`SolveRequest`]: solve::request::SolveRequest
//! [`ConstraintEngine`]: solve::engine::ConstraintEngine
//! [`MiniZincCli`]: solve::minizinc::MiniZincCli
//! [`StubEngine`]: solve::stub::StubEngine
//! [`SolveResult`]: solve::solution::SolveResult
//! [`normalize::solve`]: solve::normalize::solve
pub mod error;
pub mod solve;
