//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{OpenAIConfig, DEFAULT_SUPPORTED_MODELS};
use crate::application::GenerationSettings;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Accepted model names (comma-separated). Defaults to the built-in list.
    pub supported_models: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    pub temperature: Option<f32>,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Supported models as a vector
    pub fn supported_models_list(&self) -> Vec<String> {
        match &self.supported_models {
            Some(list) => list
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            None => DEFAULT_SUPPORTED_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Builds the OpenAI adapter configuration.
    pub fn openai_config(&self) -> Result<OpenAIConfig, ValidationError> {
        let api_key = self
            .openai_api_key
            .clone()
            .filter(|_| self.has_openai())
            .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;

        Ok(OpenAIConfig::from_secret(api_key)
            .with_base_url(&self.base_url)
            .with_supported_models(self.supported_models_list())
            .with_timeout(self.timeout())
            .with_max_retries(self.max_retries))
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            max_output_tokens: Some(self.max_output_tokens),
            temperature: self.temperature,
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.supported_models_list().is_empty() {
            return Err(ValidationError::NoSupportedModels);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_output_tokens == 0 {
            return Err(ValidationError::InvalidMaxOutputTokens);
        }
        if self.temperature.is_some_and(|t| !(0.0..=2.0).contains(&t)) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            base_url: default_base_url(),
            supported_models: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            max_output_tokens: default_max_output_tokens(),
            temperature: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}

fn default_max_output_tokens() -> u32 {
    300
}
