//! Engine statistics and their translation into the result schema.

use std::collections::BTreeMap;
use std::time::Duration;

use prettytable::{Cell, Row, Table};

use crate::solve::solution::SolveResult;

/// The statistics key under which engines report the solve duration.
pub const SOLVE_TIME_KEY: &str = "solveTime";

/// A single engine statistic.
///
/// Engines differ in how they report durations: some hand back a structured
/// duration, others a bare number of seconds. Both are accepted; everything
/// else is kept as text for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Duration(Duration),
    Number(f64),
    Text(String),
}

/// The statistics mapping attached to an engine outcome.
pub type Statistics = BTreeMap<String, StatValue>;

/// Extracts the wall-clock solve duration in seconds from `statistics`.
///
/// A structured duration is converted through its total-seconds
/// representation; a numeric value is taken as seconds and clamped at zero.
/// A missing or non-numeric entry yields `0.0` — this translation never
/// fails.
pub fn solve_time_seconds(statistics: &Statistics) -> f64 {
    match statistics.get(SOLVE_TIME_KEY) {
        Some(StatValue::Duration(duration)) => duration.as_secs_f64(),
        Some(StatValue::Number(seconds)) => seconds.max(0.0),
        Some(StatValue::Text(_)) | None => 0.0,
    }
}

/// Renders a [`SolveResult`] as a human-readable table.
pub fn render_result_table(result: &SolveResult) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Status"),
        Cell::new("Solutions"),
        Cell::new("Solve Time (s)"),
        Cell::new("Error"),
    ]));
    table.add_row(Row::new(vec![
        Cell::new(&result.status),
        Cell::new(&result.num_solutions.to_string()),
        Cell::new(&format!("{:.3}", result.solve_time)),
        Cell::new(result.error.as_deref().unwrap_or("-")),
    ]));

    let mut solutions = Table::new();
    solutions.add_row(Row::new(vec![
        Cell::new("#"),
        Cell::new("Variables"),
        Cell::new("Objective"),
        Cell::new("Optimal"),
    ]));
    for (index, solution) in result.solutions.iter().enumerate() {
        let variables = solution
            .variables
            .iter()
            .map(|(name, value)| format!("{name} = {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        let objective = solution
            .objective
            .map_or_else(|| "-".to_owned(), |o| o.to_string());
        solutions.add_row(Row::new(vec![
            Cell::new(&(index + 1).to_string()),
            Cell::new(&variables),
            Cell::new(&objective),
            Cell::new(if solution.is_optimal { "yes" } else { "no" }),
        ]));
    }

    if result.solutions.is_empty() {
        table.to_string()
    } else {
        format!("{table}\n{solutions}")
    }
}
