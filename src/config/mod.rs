//! Service configuration, read from `PEN_SALES__*` environment variables.
//!
//! A `.env` file in the working directory is loaded first when present.
//! Nested keys use `__`, so `PEN_SALES__AI__OPENAI_API_KEY` sets
//! `ai.openai_api_key`.

mod ai;
mod error;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Reads `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its field type.
    /// Missing values fall back to defaults; call [`AppConfig::validate`]
    /// before serving.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PEN_SALES")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks each section, then that a request can outlive one provider call.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;

        let request_secs = self.server.request_timeout_secs;
        let provider_secs = self.ai.timeout_secs;
        if request_secs <= provider_secs {
            return Err(ValidationError::RequestTimeoutTooShort {
                request_secs,
                provider_secs,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::{ExposeSecret, Secret};
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "PEN_SALES__AI__OPENAI_API_KEY",
        "PEN_SALES__AI__SUPPORTED_MODELS",
        "PEN_SALES__AI__TIMEOUT_SECS",
        "PEN_SALES__SERVER__LOG_FORMAT",
        "PEN_SALES__SERVER__REQUEST_TIMEOUT_SECS",
        "PEN_SALES__SERVER__CORS_ORIGINS",
    ];

    /// Loads with exactly `vars` set, restoring a clean environment after.
    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        for var in VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        for (key, _) in vars {
            env::remove_var(key);
        }
        result
    }

    fn keyed() -> AppConfig {
        AppConfig {
            ai: AiConfig {
                openai_api_key: Some(Secret::new("sk-test".to_string())),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn api_key_and_model_list_come_from_the_environment() {
        let config = load_with(&[
            ("PEN_SALES__AI__OPENAI_API_KEY", "sk-test-xxx"),
            ("PEN_SALES__AI__SUPPORTED_MODELS", "gpt-4o,gpt-4o-mini"),
        ])
        .unwrap();

        assert_eq!(
            config.ai.openai_api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("sk-test-xxx")
        );
        assert_eq!(
            config.ai.supported_models_list(),
            vec!["gpt-4o".to_string(), "gpt-4o-mini".to_string()]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn serving_without_an_api_key_is_refused() {
        let config = load_with(&[]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn json_logs_and_origins_are_read_from_server_section() {
        let config = load_with(&[
            ("PEN_SALES__AI__OPENAI_API_KEY", "sk-test"),
            ("PEN_SALES__SERVER__LOG_FORMAT", "json"),
            ("PEN_SALES__SERVER__CORS_ORIGINS", "https://shop.example.com"),
        ])
        .unwrap();

        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.server.allowed_origins().unwrap().len(), 1);
    }

    #[test]
    fn unparseable_timeout_is_a_load_error() {
        let result = load_with(&[("PEN_SALES__SERVER__REQUEST_TIMEOUT_SECS", "soon")]);
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn defaults_leave_room_for_a_provider_call() {
        assert!(keyed().validate().is_ok());
    }

    #[test]
    fn request_timeout_must_outlast_the_provider() {
        let mut config = keyed();
        config.server.request_timeout_secs = 60;
        config.ai.timeout_secs = 60;

        assert!(matches!(
            config.validate(),
            Err(ValidationError::RequestTimeoutTooShort {
                request_secs: 60,
                provider_secs: 60
            })
        ));
    }
}
