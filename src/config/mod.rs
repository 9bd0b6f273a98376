//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: CrptApiConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

/// CRPT API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrptApiConfig {
    /// Documents-create endpoint URL
    pub documents_create_url: String,
    /// Per-request timeout (in milliseconds)
    pub request_timeout_millis: u64,
}

impl Default for CrptApiConfig {
    fn default() -> Self {
        Self {
            documents_create_url: "https://ismp.crpt.ru/api/v3/lk/documents/create".to_string(),
            request_timeout_millis: 3000,
        }
    }
}

impl CrptApiConfig {
    /// Per-request timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_millis)
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub limit: u32,
    /// Window duration (in milliseconds)
    pub period_millis: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 4,
            period_millis: 1000,
        }
    }
}

impl RateLimitConfig {
    /// Window duration as a [`Duration`]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_millis)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Validate for CrptApiConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.documents_create_url.is_empty() {
            return Err(ValidationError::api("documents_create_url must not be empty"));
        }
        if !self.documents_create_url.starts_with("http://")
            && !self.documents_create_url.starts_with("https://")
        {
            return Err(ValidationError::api(
                "documents_create_url must be an http(s) URL",
            ));
        }
        if self.request_timeout_millis == 0 {
            return Err(ValidationError::api("request_timeout_millis must be > 0"));
        }
        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.limit == 0 {
            return Err(ValidationError::rate_limit("limit must be at least 1"));
        }
        if self.period_millis == 0 {
            return Err(ValidationError::rate_limit("period_millis must be > 0"));
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.level.is_empty() {
            return Err(ValidationError::logging("level must not be empty"));
        }
        match self.format.as_str() {
            "compact" | "pretty" => Ok(()),
            other => Err(ValidationError::logging(format!(
                "unknown log format '{}', expected 'compact' or 'pretty'",
                other
            ))),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.rate_limit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Add local config and environment variables last (highest priority)
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CRPT").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
