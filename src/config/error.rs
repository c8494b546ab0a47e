//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid CORS origin: {0:?}")]
    InvalidCorsOrigin(String),

    #[error("Request timeout ({request_secs}s) must exceed the provider timeout ({provider_secs}s)")]
    RequestTimeoutTooShort { request_secs: u64, provider_secs: u64 },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("At least one supported model is required")]
    NoSupportedModels,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("max_output_tokens must be greater than zero")]
    InvalidMaxOutputTokens,
}
