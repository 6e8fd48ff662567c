use crate::{MockError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".method-stub.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Emit a debug event for every dispatched call
    #[serde(default = "default_true")]
    pub trace_calls: bool,
    /// Warn when unstubbing a method that has no stub
    #[serde(default)]
    pub warn_on_missing_unstub: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            trace_calls: true,
            warn_on_missing_unstub: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. "method_stub=debug"
    #[serde(default)]
    pub filter: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file in the working directory
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            MockError::Config(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            MockError::Config(format!(
                "Failed to parse TOML config from {:?}: {}",
                config_path, e
            ))
        })
    }

    /// Load default config if file is missing or unreadable
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    }
}
