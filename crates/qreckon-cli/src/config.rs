//! Configuration management for the qreckon CLI.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QRECKON_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::path::Path;

use qreckon::ReckonerConfig;
use qreckon::reckoning::{DEFAULT_PARALLEL_THRESHOLD, DEFAULT_REAL_TOLERANCE};
use serde::{Deserialize, Serialize};

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Reckoner settings
    #[serde(default)]
    pub reckoner: ReckonerSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reckoner settings as read from file or environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReckonerSettings {
    /// Imaginary parts below this magnitude are dropped
    #[serde(default = "default_real_tolerance")]
    pub real_tolerance: f64,

    /// Evaluate batches on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Minimum batch size before going parallel
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_real_tolerance() -> f64 {
    DEFAULT_REAL_TOLERANCE
}

fn default_true() -> bool {
    true
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Default for ReckonerSettings {
    fn default() -> Self {
        ReckonerSettings {
            real_tolerance: default_real_tolerance(),
            parallel: default_true(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl From<&ReckonerSettings> for ReckonerConfig {
    fn from(settings: &ReckonerSettings) -> Self {
        ReckonerConfig {
            real_tolerance: settings.real_tolerance,
            parallel: settings.parallel,
            parallel_threshold: settings.parallel_threshold,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        Config::default().merge_env()
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?.merge_env(),
            None => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into this configuration.
    ///
    /// Only variables that are set and parse override the current values.
    fn merge_env(mut self) -> Self {
        // Reckoner
        if let Ok(v) = std::env::var("QRECKON_REAL_TOLERANCE") {
            if let Ok(val) = v.parse() {
                self.reckoner.real_tolerance = val;
            }
        }
        if let Ok(v) = std::env::var("QRECKON_PARALLEL") {
            if let Ok(val) = v.parse() {
                self.reckoner.parallel = val;
            }
        }
        if let Ok(v) = std::env::var("QRECKON_PARALLEL_THRESHOLD") {
            if let Ok(val) = v.parse() {
                self.reckoner.parallel_threshold = val;
            }
        }

        // Logging
        if let Ok(v) = std::env::var("QRECKON_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("QRECKON_LOG_FORMAT") {
            self.logging.format = v;
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.reckoner.real_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "real_tolerance must be a non-negative number, got {tolerance}"
            )));
        }

        if self.reckoner.parallel_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "parallel_threshold must be greater than 0".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Reckoner settings in library form.
    pub fn reckoner_config(&self) -> ReckonerConfig {
        ReckonerConfig::from(&self.reckoner)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "console");
        assert!(config.reckoner.parallel);
        assert_eq!(config.reckoner_config(), ReckonerConfig::default());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_tolerance() {
        let mut config = Config::default();
        config.reckoner.real_tolerance = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_threshold() {
        let mut config = Config::default();
        config.reckoner.parallel_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reckoner:\n  parallel: false\nlogging:\n  format: json").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(!config.reckoner.parallel);
        assert_eq!(config.reckoner.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_from_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  level: chatty").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));

        assert!(matches!(
            Config::from_file("/nonexistent/qreckon.yaml"),
            Err(ConfigError::IoError(_))
        ));
    }
}
