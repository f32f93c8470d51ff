//! Runtime configuration.
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! search_radius_km = 15.0
//! demand_message = "Someone nearby needs {medicine}"
//! log_filter = "medstock_core=debug"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locator::{DEFAULT_DEMAND_MESSAGE, DEFAULT_SEARCH_RADIUS_KM};

/// Default `tracing` filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "medstock_core=info";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for matching, notification and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Radius for supply matching and demand fan-out, in km
    pub search_radius_km: f64,
    /// Demand message template; `{medicine}` is replaced by the medicine name
    pub demand_message: String,
    /// `tracing` filter directive
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            demand_message: DEFAULT_DEMAND_MESSAGE.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if !is_valid_radius(self.search_radius_km) {
            return Err(ConfigError::Invalid(format!(
                "search_radius_km must be a positive number, got {}",
                self.search_radius_km
            )));
        }
        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.log_filter) {
            return Err(ConfigError::Invalid(format!(
                "log_filter {:?} is not a valid filter: {}",
                self.log_filter, e
            )));
        }
        Ok(())
    }
}

/// Whether a radius is usable for matching.
pub fn is_valid_radius(radius_km: f64) -> bool {
    radius_km.is_finite() && radius_km > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search_radius_km, 20.0);
        assert!(config.demand_message.contains("{medicine}"));
        assert_eq!(config.log_filter, "medstock_core=info");
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml("search_radius_km = 5.5").unwrap();
        assert_eq!(config.search_radius_km, 5.5);
        assert_eq!(config.demand_message, DEFAULT_DEMAND_MESSAGE);
    }

    #[test]
    fn test_rejects_bad_radius() {
        assert!(matches!(
            Config::from_toml("search_radius_km = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("search_radius_km = -3.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("search_radius_km = \"far\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_bad_log_filter() {
        assert!(matches!(
            Config::from_toml("log_filter = \"medstock_core=loud\""),
            Err(ConfigError::Invalid(_))
        ));
        let config = Config::from_toml("log_filter = \"medstock_core=debug\"").unwrap();
        assert_eq!(config.log_filter, "medstock_core=debug");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medstock.toml");

        let config = Config {
            search_radius_km: 12.0,
            demand_message: "Need {medicine}".into(),
            log_filter: "medstock_core=debug".into(),
        };
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
