use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The internal failure taxonomy of the solve pipeline.
///
/// Callers of the normalization layer never see these variants directly; they
/// are collapsed into the uniform `status = "ERROR"` channel of a
/// [`SolveResult`](crate::solve::solution::SolveResult). The distinction only
/// matters for diagnostics.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("solver backend {0:?} not found")]
    BackendNotFound(String),
    #[error("failed to build model instance: {0}")]
    Instance(String),
    #[error("cannot bind parameter {name:?}: {reason}")]
    Binding { name: String, reason: String },
    #[error("engine execution failed: {0}")]
    Execution(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{inner}")]
    Inner {
        inner: Box<EngineError>,
        backtrace: Box<Backtrace>,
    },
}

impl Error {
    /// The backtrace captured where the engine error was first wrapped.
    pub fn backtrace(&self) -> &Backtrace {
        match self {
            Error::Inner { backtrace, .. } => backtrace,
        }
    }
}

impl From<EngineError> for Error {
    fn from(inner: EngineError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
