//! # Stepweave Observability
//!
//! Process-wide `tracing` subscriber setup. Library crates only emit events;
//! the binary embedding the runtime calls [`init_tracing`] once at startup.

pub mod trace;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use trace::{init_tracing, is_initialized};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, for log shippers
    #[default]
    Json,
    /// Human readable, for local development
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ObservabilityError::Config(format!(
                "unknown log format '{other}', expected json or pretty"
            ))),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
    /// Include the event target (module path) in output
    pub with_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            with_target: true,
        }
    }
}

impl ObservabilityConfig {
    /// Read `STEPWEAVE_LOG_LEVEL` and `STEPWEAVE_LOG_FORMAT`, keeping
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self, ObservabilityError> {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("STEPWEAVE_LOG_LEVEL") {
            config.level = level;
        }
        if let Ok(format) = std::env::var("STEPWEAVE_LOG_FORMAT") {
            config.format = format.parse()?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Observability framework errors
#[derive(thiserror::Error, Debug)]
pub enum ObservabilityError {
    #[error("Tracing already initialized")]
    AlreadyInitialized,

    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(ObservabilityError::Config(_))
        ));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ObservabilityConfig =
            serde_json::from_str(r#"{"format": "pretty"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, "info");
        assert!(config.with_target);
    }
}
