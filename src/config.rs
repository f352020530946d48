// src/config.rs - Single configuration file
use serde::Deserialize;
use thiserror::Error;

use crate::strategy::StrategyKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration: active strategy and catalog file locations.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_strategy")]
    pub strategy: StrategyKind,
    #[serde(default)]
    pub data: DataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            data: DataConfig::default(),
        }
    }
}

/// Where the catalog files live.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_prints_file")]
    pub prints: String,
    #[serde(default = "default_spools_file")]
    pub spools: String,
    #[serde(default = "default_printers_file")]
    pub printers: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            prints: default_prints_file(),
            spools: default_spools_file(),
            printers: default_printers_file(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("data.prints", &self.data.prints),
            ("data.spools", &self.data.spools),
            ("data.printers", &self.data.printers),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

// Default value functions
fn default_strategy() -> StrategyKind {
    StrategyKind::FewestSpoolChanges
}
fn default_prints_file() -> String {
    "data/prints.json".to_string()
}
fn default_spools_file() -> String {
    "data/spools.json".to_string()
}
fn default_printers_file() -> String {
    "data/printers.json".to_string()
}

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(config) => {
                config.validate()?;
                Ok(config)
            }
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                Err(ConfigError::Toml(e))
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            Err(ConfigError::Io(e))
        }
    }
}
