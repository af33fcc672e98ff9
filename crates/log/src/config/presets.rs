//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Format, Writer};

/// Parse a boolean flag the way shells usually spell them.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Create configuration from environment variables
    ///
    /// Reads `WARD_LOG` (falling back to `RUST_LOG`), `WARD_LOG_FORMAT`,
    /// `WARD_LOG_COLORS` and `WARD_LOG_SOURCE`. Unrecognised values keep
    /// the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("WARD_LOG").or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }

        if let Some(format) = lookup("WARD_LOG_FORMAT") {
            config.format = format.parse().unwrap_or_default();
        }

        if let Some(colors) = lookup("WARD_LOG_COLORS").as_deref().and_then(parse_flag) {
            config.display.colors = colors;
        }
        if let Some(source) = lookup("WARD_LOG_SOURCE").as_deref().and_then(parse_flag) {
            config.display.source = source;
        }

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                ..DisplayConfig::default()
            },
            reloadable: true,
            ..Self::default()
        }
    }

    /// Test configuration (trace level, captured by libtest)
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "trace".to_string(),
            format: Format::Compact,
            writer: Writer::Test,
            display: DisplayConfig {
                colors: false,
                time: false,
                thread_ids: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}
