//! Normalized solutions and the result schema handed back to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::solve::engine::SolutionRecord;

/// Marker prefix for engine-internal bookkeeping fields in a solution record.
const INTERNAL_FIELD_PREFIX: char = '_';

/// One normalized solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Variable name to bound value. Values are JSON-like: scalars, arrays,
    /// or sets as the engine encodes them.
    pub variables: BTreeMap<String, Value>,
    /// The objective value, present only for optimization problems.
    pub objective: Option<f64>,
    /// True only when the engine proved optimality for *this* solution.
    pub is_optimal: bool,
}

impl Solution {
    /// Extracts a normalized solution from one engine record.
    ///
    /// Every assignment whose name does not carry the engine's internal
    /// marker is copied into `variables`; the objective is carried through
    /// only when the record reports one. Optimality is decided by the caller
    /// from the canonical status, never inferred here.
    pub fn from_record(record: &SolutionRecord, is_optimal: bool) -> Self {
        let variables = record
            .assignments
            .iter()
            .filter(|(name, _)| !name.starts_with(INTERNAL_FIELD_PREFIX))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Solution {
            variables,
            objective: record.objective,
            is_optimal,
        }
    }
}

/// The normalized outcome of one solve call.
///
/// Structurally valid by construction: `num_solutions` always equals
/// `solutions.len()`, and `error` is present exactly when `status` is
/// `"ERROR"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Solutions in discovery order; meaningful beyond the first entry only
    /// in enumeration mode.
    pub solutions: Vec<Solution>,
    /// A canonical status string, or the literal representation of an
    /// unrecognized engine status.
    pub status: String,
    /// Best-effort wall-clock solve duration in seconds, never negative.
    pub solve_time: f64,
    pub num_solutions: usize,
    /// Human-readable failure message, present iff `status == "ERROR"`.
    pub error: Option<String>,
}

/// The status string reserved for the normalizer's failure path.
pub const STATUS_ERROR: &str = "ERROR";

impl SolveResult {
    /// A completed (non-failure) result.
    pub fn completed(solutions: Vec<Solution>, status: impl Into<String>, solve_time: f64) -> Self {
        let num_solutions = solutions.len();
        SolveResult {
            solutions,
            status: status.into(),
            solve_time,
            num_solutions,
            error: None,
        }
    }

    /// The single terminal failure state of the whole pipeline.
    pub fn failure(message: impl Into<String>) -> Self {
        SolveResult {
            solutions: Vec::new(),
            status: STATUS_ERROR.to_owned(),
            solve_time: 0.0,
            num_solutions: 0,
            error: Some(message.into()),
        }
    }
}
