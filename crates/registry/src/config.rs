//! Registry configuration
//!
//! ```
//! use std::time::Duration;
//! use ward_registry::{Ownership, RegistryConfig};
//!
//! let config = RegistryConfig::default()
//!     .with_ownership(Ownership::Weak)
//!     .with_lock_timeout(Duration::from_millis(50));
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::holder::Ownership;

/// Environment variable selecting [`Ownership`] (`strong` or `weak`).
pub const ENV_OWNERSHIP: &str = "WARD_REGISTRY_OWNERSHIP";

/// Environment variable holding the lock timeout in humantime form (`250ms`, `2s`).
pub const ENV_LOCK_TIMEOUT: &str = "WARD_REGISTRY_LOCK_TIMEOUT";

/// Longest lock timeout a configuration may request.
pub const MAX_LOCK_TIMEOUT: Duration = Duration::from_secs(3600);

/// Construction parameters for a [`Registry`](crate::Registry).
///
/// A zero `lock_timeout` means "wait for the lock indefinitely".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Whether members are kept alive by the registry
    pub ownership: Ownership,

    /// How long an operation waits for the registry lock
    #[serde(with = "humantime_serde")]
    pub lock_timeout: Duration,
}

impl RegistryConfig {
    /// Set the ownership mode
    #[must_use]
    pub const fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Set the lock timeout
    #[must_use]
    pub const fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Whether operations block until the lock is free
    pub fn waits_forever(&self) -> bool {
        self.lock_timeout.is_zero()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.lock_timeout > MAX_LOCK_TIMEOUT {
            return Err(RegistryError::config(format!(
                "lock_timeout {} exceeds the maximum of {}",
                humantime::format_duration(self.lock_timeout),
                humantime::format_duration(MAX_LOCK_TIMEOUT),
            )));
        }
        Ok(())
    }

    /// Create configuration from environment variables
    ///
    /// Unset variables fall back to the defaults (strong, wait forever).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(ownership) = lookup(ENV_OWNERSHIP) {
            config.ownership = ownership.parse()?;
        }

        if let Some(timeout) = lookup(ENV_LOCK_TIMEOUT) {
            config.lock_timeout = humantime::parse_duration(timeout.trim()).map_err(|e| {
                RegistryError::config(format!("{ENV_LOCK_TIMEOUT}='{timeout}': {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn default_is_strong_and_blocking() {
        let config = RegistryConfig::default();
        assert_eq!(config.ownership, Ownership::Strong);
        assert!(config.waits_forever());
    }

    #[test]
    fn deserializes_humantime_timeout() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"ownership":"weak","lock_timeout":"250ms"}"#).unwrap();
        assert_eq!(
            config,
            RegistryConfig::default()
                .with_ownership(Ownership::Weak)
                .with_lock_timeout(Duration::from_millis(250))
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: RegistryConfig = serde_json::from_str(r#"{"ownership":"weak"}"#).unwrap();
        assert_eq!(config.ownership, Ownership::Weak);
        assert!(config.waits_forever());
    }

    #[test]
    fn serializes_timeout_as_text() {
        let config = RegistryConfig::default().with_lock_timeout(Duration::from_secs(2));
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["lock_timeout"], "2s");
        assert_eq!(json["ownership"], "strong");
    }

    #[test]
    fn rejects_excessive_timeout() {
        let config = RegistryConfig::default().with_lock_timeout(Duration::from_secs(7200));
        assert!(matches!(
            config.validate(),
            Err(RegistryError::Config { .. })
        ));
    }

    #[test]
    fn lookup_reads_both_variables() {
        let config = RegistryConfig::from_lookup(lookup(&[
            (ENV_OWNERSHIP, "weak"),
            (ENV_LOCK_TIMEOUT, "1s 500ms"),
        ]))
        .unwrap();
        assert_eq!(config.ownership, Ownership::Weak);
        assert_eq!(config.lock_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn lookup_without_variables_is_default() {
        let config = RegistryConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn lookup_rejects_malformed_timeout() {
        let err = RegistryConfig::from_lookup(lookup(&[(ENV_LOCK_TIMEOUT, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_LOCK_TIMEOUT));
    }
}
