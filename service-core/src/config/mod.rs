use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string())
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn is_prod(&self) -> bool {
        self.environment == "prod"
    }
}

/// Read an environment variable, falling back to `default` outside production.
///
/// In production every variable must be set explicitly. A variable without a
/// default is required in every environment.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => {
            if is_prod && default.is_some() {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_variable_is_a_config_error() {
        let err = get_env("SERVICE_CORE_TEST_UNSET_VARIABLE", None, false).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("SERVICE_CORE_TEST_UNSET_VARIABLE"));
    }

    #[test]
    fn default_is_used_outside_production() {
        let value = get_env("SERVICE_CORE_TEST_UNSET_DEFAULTED", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn defaults_are_refused_in_production() {
        let err = get_env("SERVICE_CORE_TEST_UNSET_PROD", Some("fallback"), true).unwrap_err();
        assert!(err.to_string().contains("required in production"));
    }
}
