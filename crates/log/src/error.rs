//! Logging errors

use thiserror::Error;

/// Result type for logger setup
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while building or reconfiguring the logger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The level / directive string could not be parsed
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// Configuration could not be applied
    #[error("logger configuration error: {0}")]
    Config(String),

    /// A global subscriber was already installed
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}
