use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default location of the persisted record file, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "students.csv";

/// Default maximum number of records held in memory
pub const DEFAULT_CAPACITY: usize = 100;

/// Upper bound accepted for `capacity`; a config may only lower the limit
pub const MAX_CAPACITY: usize = DEFAULT_CAPACITY;

/// File logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    /// Write a JSON log file in addition to stderr
    #[serde(default)]
    pub enabled: bool,

    /// Directory for rolling log files (default: ./logs)
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, directory: default_log_dir() }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when no environment override is set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// stderr format: "pretty", "json" or "compact"; unset means detect from the terminal
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub file: FileLoggingConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: None, file: FileLoggingConfig::default() }
    }
}

/// Root configuration structure for roster.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Persisted record file
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Maximum number of records
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Config { data_file: default_data_file(), capacity: default_capacity(), logging: LoggingConfig::default() }
    }
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).map_err(|e| Error::Config(ConfigError::from(e).to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(Error::Config(ConfigError::InvalidCapacity(self.capacity).to_string()));
        }

        if self.data_file.as_os_str().is_empty() {
            return Err(Error::Config(ConfigError::EmptyDataFile.to_string()));
        }

        if let Some(format) = &self.logging.format
            && !matches!(format.to_lowercase().as_str(), "pretty" | "json" | "compact")
        {
            return Err(Error::Config(ConfigError::InvalidLogFormat(format.clone()).to_string()));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# Roster configuration
# Every key is optional; the values below are the defaults.

# Persisted record file (one record per line: name,roll,course,year,cgpa)
data_file = "students.csv"

# Maximum number of records kept in memory
capacity = 100

[logging]
# Filter directive, overridden by ROSTER_LOG or RUST_LOG
level = "warn"
# stderr format: "pretty", "json" or "compact" (default: detect from terminal)
# format = "compact"

[logging.file]
enabled = false
directory = "logs"
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("capacity must be between 1 and 100, got {0}")]
    InvalidCapacity(usize),

    #[error("data_file must not be empty")]
    EmptyDataFile,

    #[error("invalid log format: {0}")]
    InvalidLogFormat(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.data_file, PathBuf::from("students.csv"));
        assert_eq!(config.capacity, 100);
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.format.is_none());
        assert!(!config.logging.file.enabled);
    }

    #[test]
    fn test_config_example_parses_to_default() {
        let config = Config::from_toml_str(Config::example()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_empty_string_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_overrides() {
        let toml = r#"
data_file = "/tmp/records.csv"
capacity = 5

[logging]
level = "debug"
format = "json"

[logging.file]
enabled = true
directory = "/var/log/roster"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/records.csv"));
        assert_eq!(config.capacity, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert!(config.logging.file.enabled);
        assert_eq!(config.logging.file.directory, PathBuf::from("/var/log/roster"));
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let err = Config::from_toml_str("capacity = 0").unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn test_config_rejects_capacity_above_store_limit() {
        assert_eq!(Config::from_toml_str("capacity = 100").unwrap().capacity, MAX_CAPACITY);

        let err = Config::from_toml_str("capacity = 101").unwrap_err();
        assert!(err.to_string().contains("between 1 and 100, got 101"));
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(Config::from_toml_str("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_config_rejects_bad_log_format() {
        let err = Config::from_toml_str("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_config_invalid_toml() {
        let err = Config::from_toml_str("invalid toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_or_default(&temp.path().join("roster.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("roster.toml");
        std::fs::write(&path, "capacity = 3").unwrap();

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.capacity, 3);
    }
}
