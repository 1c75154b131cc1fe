//! The solve pipeline: request, invocation, and result normalization.
//!
//! Data flows one way through this module: a [`request::SolveRequest`] goes
//! into [`driver::run`], which drives a [`engine::ConstraintEngine`]; the raw
//! [`engine::EngineOutcome`] (or the failure it raised) is then collapsed by
//! [`normalize::solve`] into a [`solution::SolveResult`] using the status
//! mapper, the solution extractor, and the statistics translator.

pub mod driver;
pub mod engine;
pub mod minizinc;
pub mod normalize;
pub mod request;
pub mod solution;
pub mod stats;
pub mod status;
pub mod stub;
