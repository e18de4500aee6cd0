use crate::models::Units;
use secrecy::Secret;
use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;

/// Default number of placemarks requested from the model.
const DEFAULT_PLACEMARK_COUNT: usize = 5;

const DEFAULT_GENAI_MODEL: &str = "Qwen/Qwen2.5-Coder-32B-Instruct";
const DEFAULT_ROUTES_API_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";
const DEFAULT_BLOB_API_URL: &str = "https://blob.vercel-storage.com";

#[derive(Debug, Clone)]
pub struct TourConfig {
    pub common: core_config::Config,
    pub genai: GenaiConfig,
    pub routes: RoutesConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub pipeline: PipelineSettings,
    pub otlp_endpoint: String,
}

#[derive(Debug, Clone)]
pub struct GenaiConfig {
    pub api_key: Secret<String>,
    /// Model identifier sent in the chat-completions body.
    pub model: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RoutesConfig {
    pub api_key: Secret<String>,
    pub api_url: String,
    pub language_code: String,
    pub units: Units,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_path: String,
    pub public_base_url: String,
    pub blob_api_url: String,
    pub blob_token: Option<Secret<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Blob,
}

/// Knobs of the tour pipeline that are not tied to an upstream client.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub default_placemark_count: usize,
    /// Example document the model is asked to imitate.
    pub template: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            default_placemark_count: DEFAULT_PLACEMARK_COUNT,
            template: crate::kml::TEMPLATE_KML.to_string(),
        }
    }
}

impl TourConfig {
    /// Load configuration from the environment.
    ///
    /// Both upstream credentials are required; a missing key fails startup
    /// instead of surfacing later as a per-request error.
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = common.is_prod();

        let genai_model = get_env("GENAI_MODEL", Some(DEFAULT_GENAI_MODEL), is_prod)?;
        let default_genai_url = format!(
            "https://api-inference.huggingface.co/models/{}/v1/chat/completions",
            genai_model
        );

        let storage_backend: StorageBackend = get_env("STORAGE_BACKEND", Some("local"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let blob_token = match storage_backend {
            StorageBackend::Blob => Some(Secret::new(get_env(
                "BLOB_READ_WRITE_TOKEN",
                None,
                is_prod,
            )?)),
            StorageBackend::Local => None,
        };

        Ok(TourConfig {
            genai: GenaiConfig {
                api_key: Secret::new(get_env("HUGGINGFACE_API_KEY", None, is_prod)?),
                api_url: get_env("GENAI_API_URL", Some(&default_genai_url), is_prod)?,
                model: genai_model,
                timeout_secs: parse_number("GENAI_TIMEOUT_SECS", 120, is_prod)?,
            },
            routes: RoutesConfig {
                api_key: Secret::new(get_env("GOOGLE_MAPS_API_KEY", None, is_prod)?),
                api_url: get_env("ROUTES_API_URL", Some(DEFAULT_ROUTES_API_URL), is_prod)?,
                language_code: get_env("ROUTES_LANGUAGE_CODE", Some("en-US"), is_prod)?,
                units: get_env("ROUTES_UNITS", Some("IMPERIAL"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            },
            database: DatabaseConfig {
                url: Secret::new(get_env("DATABASE_URL", None, is_prod)?),
                max_connections: parse_number("DATABASE_MAX_CONNECTIONS", 5, is_prod)?,
            },
            storage: StorageConfig {
                backend: storage_backend,
                local_path: get_env("STORAGE_LOCAL_PATH", Some("storage"), is_prod)?,
                public_base_url: get_env(
                    "STORAGE_PUBLIC_BASE_URL",
                    Some(&format!("http://localhost:{}/files", common.port)),
                    is_prod,
                )?,
                blob_api_url: get_env("BLOB_API_URL", Some(DEFAULT_BLOB_API_URL), is_prod)?,
                blob_token,
            },
            pipeline: PipelineSettings {
                default_placemark_count: parse_number(
                    "TOUR_PLACEMARK_COUNT",
                    DEFAULT_PLACEMARK_COUNT,
                    is_prod,
                )?,
                template: crate::kml::TEMPLATE_KML.to_string(),
            },
            otlp_endpoint: std::env::var("OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://tempo:4317".to_string()),
            common,
        })
    }
}

fn parse_number<T>(key: &str, default: T, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr + ToString,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(&default.to_string()), is_prod)?
        .parse()
        .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e)))
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "blob" => Ok(StorageBackend::Blob),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("LOCAL".parse::<StorageBackend>(), Ok(StorageBackend::Local));
        assert_eq!("blob".parse::<StorageBackend>(), Ok(StorageBackend::Blob));
        assert!("s3".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn pipeline_settings_default_to_five_placemarks() {
        let settings = PipelineSettings::default();
        assert_eq!(settings.default_placemark_count, 5);
        assert!(settings.template.contains("<Placemark>"));
    }
}
