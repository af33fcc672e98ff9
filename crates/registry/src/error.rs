//! Error types for registry operations
use std::time::Duration;

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors reported by the `try_*` registry API and by configuration loading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry lock could not be acquired within the configured timeout
    #[error("registry lock not acquired within {}", human(.timeout))]
    LockTimeout {
        /// The configured lock timeout
        timeout: Duration,
    },

    /// Registry configuration is invalid
    #[error("invalid registry configuration: {message}")]
    Config {
        /// The error message
        message: String,
    },
}

fn human(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

impl RegistryError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a lock timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }
}
