//! Unified error type surfaced by the runtime API.
//!
//! Wraps engine failures and configuration problems so callers can bubble
//! them up with consistent context.

use arena_core::{EngineError, ErrorSeverity, GameError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to load engine configuration: {0}")]
    Config(String),
}

impl RuntimeError {
    /// The wrapped engine error, if any.
    pub fn engine(&self) -> Option<&EngineError> {
        match self {
            RuntimeError::Engine(err) => Some(err),
            RuntimeError::Config(_) => None,
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Engine(err) => err.severity(),
            RuntimeError::Config(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Engine(err) => err.error_code(),
            RuntimeError::Config(_) => "CONFIG",
        }
    }
}
