//! Configuration for the bot manager
//!
//! Handles loading from JSON or YAML documents, per-field validation, and
//! duration accessors for the float-seconds fields.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `num_bots` below the minimum of 1
    #[error("num_bots must be at least 1, got {0}")]
    InvalidNumBots(usize),

    /// `retry_delay` negative or not a finite number
    #[error("retry_delay must be a finite number of seconds >= 0, got {0}")]
    InvalidRetryDelay(f64),

    /// `monitor_interval` non-positive or not a finite number
    #[error("monitor_interval must be a finite number of seconds > 0, got {0}")]
    InvalidMonitorInterval(f64),

    /// Configuration file extension is neither JSON nor YAML
    #[error("unsupported configuration file format: {0}")]
    UnsupportedFormat(String),

    /// Configuration file could not be read or written
    #[error("configuration file {path}: {source}")]
    Io {
        /// Path of the offending file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration document is not valid JSON
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration document is not valid YAML
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration settings for the bot manager
///
/// Unknown document fields are ignored; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Number of concurrent bots
    pub num_bots: usize,

    /// Maximum retry attempts for a failed task, beyond the first attempt
    pub max_retries: u32,

    /// Fixed delay between retries, in seconds
    #[serde(rename = "retry_delay")]
    pub retry_delay_secs: f64,

    /// Enable detailed logging
    pub verbose: bool,

    /// Progress monitoring interval, in seconds
    #[serde(rename = "monitor_interval")]
    pub monitor_interval_secs: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            num_bots: num_cpus::get(),
            max_retries: 3,
            retry_delay_secs: 1.0,
            verbose: false,
            monitor_interval_secs: 1.0,
        }
    }
}

impl BotConfig {
    /// Validate every field, naming the offending field on failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bots < 1 {
            return Err(ConfigError::InvalidNumBots(self.num_bots));
        }

        if !self.retry_delay_secs.is_finite() || self.retry_delay_secs < 0.0 {
            return Err(ConfigError::InvalidRetryDelay(self.retry_delay_secs));
        }

        if !self.monitor_interval_secs.is_finite() || self.monitor_interval_secs <= 0.0 {
            return Err(ConfigError::InvalidMonitorInterval(
                self.monitor_interval_secs,
            ));
        }

        Ok(())
    }

    /// Fixed delay between retry attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.retry_delay_secs).unwrap_or(Duration::ZERO)
    }

    /// Interval between progress polls.
    pub fn monitor_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.monitor_interval_secs).unwrap_or(Duration::ZERO)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: Self = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, dispatching on its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        match extension {
            "json" => Self::from_json_file(path),
            "yaml" | "yml" => Self::from_yaml_file(path),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Write the configuration to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Write the configuration to a YAML file.
    pub fn save_yaml(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = serde_yaml::to_string(self)?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
