//! # Configuration
//!
//! Layered configuration loading using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`DISPATCH_*` prefix, e.g. `DISPATCH_CAPACITY_CEILING=5`)
//! 2. `dispatch.toml` in the working directory, if present
//! 3. Built-in defaults
//!
//! ```no_run
//! use dispatch_core::config::DispatchConfig;
//!
//! let config = DispatchConfig::load().expect("config");
//! println!("capacity ceiling: {}", config.capacity_ceiling);
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "dispatch.toml";
pub const ENV_PREFIX: &str = "DISPATCH_";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum open assignments any partner may hold at once.
    pub capacity_ceiling: u32,
    /// Mailbox capacity of every store actor.
    pub mailbox_size: usize,
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            capacity_ceiling: 3,
            mailbox_size: 32,
            log_filter: "info".to_string(),
        }
    }
}

impl DispatchConfig {
    /// Load from defaults, `dispatch.toml` and the environment, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Like [`DispatchConfig::load`] with an explicit file path. A missing file is skipped.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path.as_ref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the provider chain without extracting, so tests can layer more on top.
    pub fn figment(path: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity_ceiling == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capacity_ceiling".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.mailbox_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "mailbox_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_filter".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = DispatchConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config, DispatchConfig::default());
            assert_eq!(config.capacity_ceiling, 3);
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
capacity_ceiling = 1
log_filter = "dispatch_core=debug"
"#,
            )?;
            let config = DispatchConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.capacity_ceiling, 1);
            assert_eq!(config.mailbox_size, 32);
            assert_eq!(config.log_filter, "dispatch_core=debug");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "capacity_ceiling = 1\nmailbox_size = 8\n")?;
            jail.set_env("DISPATCH_CAPACITY_CEILING", "4");
            let config = DispatchConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.capacity_ceiling, 4);
            assert_eq!(config.mailbox_size, 8);
            Ok(())
        });
    }

    #[test]
    fn zero_capacity_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("DISPATCH_CAPACITY_CEILING", "0");
            let err = DispatchConfig::load().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref field, .. } if field == "capacity_ceiling"
            ));
            Ok(())
        });
    }

    #[test]
    fn malformed_value_surfaces_figment_error() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "mailbox_size = \"lots\"\n")?;
            let err = DispatchConfig::load().unwrap_err();
            assert!(matches!(err, ConfigError::Figment(_)));
            Ok(())
        });
    }
}
