//! Maps engine-native solve statuses onto the canonical taxonomy exposed to
//! callers.

/// A solve status as reported by the underlying engine.
///
/// The named variants cover the MiniZinc status vocabulary; anything outside
/// it is carried verbatim in [`EngineStatus::Other`] so the mapping stays
/// total. Engine-side *error* states are not represented here: an engine that
/// fails reports through [`EngineError`](crate::error::EngineError), and the
/// `"ERROR"` status string is produced only by the result normalizer's own
/// recovery path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// At least one satisfying solution was found.
    Satisfied,
    /// The search space was exhaustively enumerated.
    AllSolutions,
    /// A solution was found and proven optimal.
    OptimalSolution,
    /// The model was proven to have no solution.
    Unsatisfiable,
    /// The model is either unsatisfiable or unbounded.
    UnsatOrUnbounded,
    /// The objective is unbounded.
    Unbounded,
    /// The engine reached no decision (e.g. stopped on a time budget before
    /// finding anything).
    Unknown,
    /// A status outside the known vocabulary, preserved literally.
    Other(String),
}

impl EngineStatus {
    /// The canonical status string for this engine status.
    ///
    /// Recognized statuses collapse to the closed set `SATISFIED`,
    /// `ALL_SOLUTIONS`, `OPTIMAL_SOLUTION`, `UNSATISFIABLE`,
    /// `UNSAT_OR_UNBOUNDED`, `UNBOUNDED`, `UNKNOWN`; anything else passes
    /// through as its literal representation rather than failing.
    pub fn canonical(&self) -> &str {
        match self {
            EngineStatus::Satisfied => "SATISFIED",
            EngineStatus::AllSolutions => "ALL_SOLUTIONS",
            EngineStatus::OptimalSolution => "OPTIMAL_SOLUTION",
            EngineStatus::Unsatisfiable => "UNSATISFIABLE",
            EngineStatus::UnsatOrUnbounded => "UNSAT_OR_UNBOUNDED",
            EngineStatus::Unbounded => "UNBOUNDED",
            EngineStatus::Unknown => "UNKNOWN",
            EngineStatus::Other(literal) => literal,
        }
    }

    /// Parses a status name from an engine's native vocabulary.
    ///
    /// Total: unrecognized names become [`EngineStatus::Other`].
    pub fn parse(name: &str) -> EngineStatus {
        match name {
            "SATISFIED" => EngineStatus::Satisfied,
            "ALL_SOLUTIONS" => EngineStatus::AllSolutions,
            "OPTIMAL_SOLUTION" => EngineStatus::OptimalSolution,
            "UNSATISFIABLE" => EngineStatus::Unsatisfiable,
            "UNSAT_OR_UNBOUNDED" => EngineStatus::UnsatOrUnbounded,
            "UNBOUNDED" => EngineStatus::Unbounded,
            "UNKNOWN" => EngineStatus::Unknown,
            other => EngineStatus::Other(other.to_owned()),
        }
    }

    /// Whether this status indicates at least one usable solution record.
    pub fn has_solutions(&self) -> bool {
        matches!(
            self,
            EngineStatus::Satisfied | EngineStatus::AllSolutions | EngineStatus::OptimalSolution
        )
    }
}
