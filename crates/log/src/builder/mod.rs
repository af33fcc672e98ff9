//! Logger builder
//!
//! - `format`: format layer macros
//! - `reload`: runtime filter reload

#[macro_use]
mod format;
mod reload;

pub use reload::ReloadHandle;

use tracing_subscriber::{Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{Config, Format},
    error::{LogError, LogResult},
    writer,
};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Keeps the installed logger's handles alive
#[derive(Debug)]
#[must_use = "dropping the guard discards the reload handle"]
pub struct LoggerGuard {
    reload_handle: Option<ReloadHandle>,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build the subscriber and install it as the global default
    ///
    /// # Errors
    ///
    /// - [`LogError::Filter`] if the level directives do not parse
    /// - [`LogError::AlreadyInitialized`] if a global subscriber exists
    pub fn build(self) -> LogResult<LoggerGuard> {
        let Self { config } = self;

        let filter = reload::parse_filter(&config.level)?;
        let (filter_layer, reload_handle) =
            reload::create_filter_layer(filter, &config.level, config.reloadable);
        let writer = writer::make_writer(config.writer);

        let installed = match config.format {
            Format::Pretty => install_fmt_layer!(pretty, config.display, writer, filter_layer),
            Format::Compact => install_fmt_layer!(compact, config.display, writer, filter_layer),
            Format::Json => install_json_layer!(config.display, writer, filter_layer),
        };
        installed.map_err(|_| LogError::AlreadyInitialized)?;

        tracing::debug!(
            level = %config.level,
            format = ?config.format,
            reloadable = config.reloadable,
            "logger initialized"
        );

        Ok(LoggerGuard { reload_handle })
    }
}

impl LoggerGuard {
    /// Handle for changing the filter, present when the config was `reloadable`
    #[must_use]
    pub fn reload_handle(&self) -> Option<&ReloadHandle> {
        self.reload_handle.as_ref()
    }
}
