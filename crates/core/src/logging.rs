//! Logging setup on top of the tracing ecosystem.
//!
//! All log output goes to stderr (and optionally a rolling file) so it never
//! interleaves with the menu transcript on stdout.
//!
//! # Environment Variables
//!
//! - `ROSTER_LOG`: Filter directive (like `RUST_LOG`), e.g., `roster_store=debug`
//! - `ROSTER_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//!
//! # Example
//!
//! ```no_run
//! use roster_core::config::LoggingConfig;
//! use roster_core::logging;
//!
//! let _guard = logging::init_logging(&LoggingConfig::default())?;
//! # Ok::<(), roster_core::Error>(())
//! ```

use crate::Error;
use crate::config::LoggingConfig;
use std::env;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Resolve the filter directive: `ROSTER_LOG`, then `RUST_LOG`, then the configured level.
fn filter_directive(config: &LoggingConfig) -> String {
    env::var("ROSTER_LOG")
        .ok()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| config.level.clone())
}

/// Resolve the stderr format: `ROSTER_LOG_FORMAT`, then the config, then TTY detection.
fn detect_format(config: &LoggingConfig) -> LogFormat {
    if let Ok(fmt_str) = env::var("ROSTER_LOG_FORMAT")
        && let Some(fmt) = LogFormat::parse_str(&fmt_str)
    {
        return fmt;
    }

    if let Some(fmt) = config.format.as_deref().and_then(LogFormat::parse_str) {
        return fmt;
    }

    if atty::is(atty::Stream::Stderr) { LogFormat::Pretty } else { LogFormat::Compact }
}

/// Initialize the global tracing subscriber.
///
/// When file logging is enabled the returned guard must be held for the life
/// of the process; dropping it flushes and stops the background writer.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Error> {
    let env_filter = EnvFilter::try_new(filter_directive(config))
        .map_err(|e| Error::Config(format!("invalid log filter: {}", e)))?;
    let format = detect_format(config);

    let registry = Registry::default().with(env_filter);

    if config.file.enabled {
        let log_dir = &config.file.directory;
        std::fs::create_dir_all(log_dir)
            .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "roster.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let installed = match format {
            LogFormat::Pretty => registry
                .with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true))
                .with(fmt::layer().json().with_writer(non_blocking))
                .try_init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_writer(io::stderr))
                .with(fmt::layer().json().with_writer(non_blocking))
                .try_init(),
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .with(fmt::layer().json().with_writer(non_blocking))
                .try_init(),
        };
        installed.map_err(|e| Error::Other(format!("Failed to install subscriber: {}", e)))?;

        Ok(Some(guard))
    } else {
        let installed = match format {
            LogFormat::Pretty => registry
                .with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true))
                .try_init(),
            LogFormat::Json => registry.with(fmt::layer().json().with_writer(io::stderr)).try_init(),
            LogFormat::Compact => registry.with(fmt::layer().compact().with_writer(io::stderr)).try_init(),
        };
        installed.map_err(|e| Error::Other(format!("Failed to install subscriber: {}", e)))?;

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse_str("Compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse_str("invalid"), None);
    }

    #[test]
    fn test_log_format_as_str_round_trips() {
        for format in LogFormat::VALUES {
            assert_eq!(LogFormat::parse_str(format.as_str()), Some(*format));
        }
    }

    #[test]
    fn test_log_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_configured_format_is_used() {
        if env::var("ROSTER_LOG_FORMAT").is_ok() {
            return;
        }
        let config = LoggingConfig { format: Some("json".to_string()), ..LoggingConfig::default() };
        assert_eq!(detect_format(&config), LogFormat::Json);
    }

    #[test]
    fn test_filter_directive_falls_back_to_level() {
        if env::var("ROSTER_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig { level: "debug".to_string(), ..LoggingConfig::default() };
        assert_eq!(filter_directive(&config), "debug");
    }

    #[test]
    fn test_init_logging_with_file_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = LoggingConfig {
            level: "info".to_string(),
            format: Some("compact".to_string()),
            file: crate::config::FileLoggingConfig { enabled: true, directory: temp.path().join("logs") },
        };

        let guard = init_logging(&config).unwrap();
        assert!(guard.is_some());
        assert!(temp.path().join("logs").is_dir());
    }
}
