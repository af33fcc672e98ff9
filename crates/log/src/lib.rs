//! # Ward Log
//!
//! Logging bootstrap shared by the ward crates. Library code only emits
//! `tracing` events; binaries and tests decide where they go.
//!
//! ```no_run
//! use ward_log::{Config, LoggerBuilder};
//!
//! let guard = LoggerBuilder::from_config(Config::production()).build()?;
//! if let Some(handle) = guard.reload_handle() {
//!     handle.reload("warn,ward_registry=debug")?;
//! }
//! # Ok::<(), ward_log::LogError>(())
//! ```

mod builder;
mod config;
mod error;
mod writer;

use std::sync::OnceLock;

pub use builder::{LoggerBuilder, LoggerGuard, ReloadHandle};
pub use config::{Config, DisplayConfig, Format, Writer};
pub use error::{LogError, LogResult};

/// Install a logger configured from the environment
///
/// # Errors
/// See [`LoggerBuilder::build`].
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::from_env())
}

/// Install a logger with an explicit configuration
///
/// # Errors
/// See [`LoggerBuilder::build`].
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Install the test logger once per process
///
/// Safe to call from every test. If some other subscriber got there first
/// it is left alone.
pub fn init_test() {
    static GUARD: OnceLock<Option<LoggerGuard>> = OnceLock::new();
    GUARD.get_or_init(|| init_with(Config::test()).ok());
}
