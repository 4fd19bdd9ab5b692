//! # Engine Configuration
//!
//! Configuration can be built in code, loaded from a TOML file, or read from
//! environment variables.
//!
//! ## Environment Variables
//!
//! - `STEPWEAVE_CACHE_ENABLED` - Cache successful tool results (default: true)
//! - `STEPWEAVE_CACHE_DEFAULT_TTL_SECS` - TTL for tools without their own (default: 300)
//! - `STEPWEAVE_CACHE_SWEEP_INTERVAL_SECS` - Background sweep of expired entries (default: off)
//! - `STEPWEAVE_DEPENDENCY_KEYWORDS` - Comma separated dependency phrases
//!   (default: `previous,above,result from,using the`)
//!
//! ## TOML
//!
//! ```toml
//! cache_enabled = true
//! default_cache_ttl_secs = 600
//! sweep_interval_secs = 60
//! dependency_keywords = ["previous", "above", "result from", "using the"]
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path, time::Duration};

use crate::grouping::DEFAULT_DEPENDENCY_KEYWORDS;

/// Default TTL for cached tool results, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Upper bound for any configured TTL, in seconds.
pub const MAX_CACHE_TTL_SECS: u64 = 86_400;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Validated engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cache_enabled: bool,
    pub default_cache_ttl_secs: u64,
    pub sweep_interval_secs: Option<u64>,
    pub dependency_keywords: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            default_cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            sweep_interval_secs: None,
            dependency_keywords: DEFAULT_DEPENDENCY_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    pub fn default_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.default_cache_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_secs.map(Duration::from_secs)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_toml(&content)
    }

    /// Load configuration from a TOML string. Missing keys take defaults.
    pub fn load_from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_cache_ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "default_cache_ttl_secs must be greater than 0".to_string(),
            ));
        }
        if self.default_cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::ValidationError(format!(
                "default_cache_ttl_secs must be <= {MAX_CACHE_TTL_SECS} (24 hours)"
            )));
        }
        if self.sweep_interval_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "sweep_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.dependency_keywords.is_empty() {
            return Err(ConfigError::ValidationError(
                "dependency_keywords cannot be empty".to_string(),
            ));
        }
        if self.dependency_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "dependency_keywords cannot contain blank entries".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for `EngineConfig` with environment variable support
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any environment variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::default();

        if let Some(enabled) = parse_bool(&lookup, "STEPWEAVE_CACHE_ENABLED")? {
            builder = builder.cache_enabled(enabled);
        }
        if let Some(ttl) = parse_u64(&lookup, "STEPWEAVE_CACHE_DEFAULT_TTL_SECS")? {
            builder = builder.default_cache_ttl_secs(ttl);
        }
        if let Some(interval) = parse_u64(&lookup, "STEPWEAVE_CACHE_SWEEP_INTERVAL_SECS")? {
            builder = builder.sweep_interval_secs(interval);
        }
        if let Some(keywords) = lookup("STEPWEAVE_DEPENDENCY_KEYWORDS") {
            builder = builder.dependency_keywords(keywords.split(',').map(str::trim));
        }

        Ok(builder)
    }

    /// Enable or disable result caching
    #[must_use]
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    /// Set the default cache TTL in seconds
    #[must_use]
    pub fn default_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.default_cache_ttl_secs = secs;
        self
    }

    /// Sweep expired cache entries every `secs` seconds
    #[must_use]
    pub fn sweep_interval_secs(mut self, secs: u64) -> Self {
        self.config.sweep_interval_secs = Some(secs);
        self
    }

    /// Replace the dependency keyword list
    #[must_use]
    pub fn dependency_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.dependency_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Validate configuration and build `EngineConfig`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// Environment variable helper functions

fn parse_bool<F>(lookup: &F, key: &str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!(
                    "invalid boolean value '{val}', expected true/false/1/0/yes/no/on/off"
                ),
            }),
        },
        None => Ok(None),
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => val
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid u64 value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}
