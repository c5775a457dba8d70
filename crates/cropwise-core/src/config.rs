use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable consulted when no OpenWeather key is configured.
pub const OPENWEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream data sources
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP client behaviour
    #[serde(default)]
    pub http: HttpConfig,

    /// Place autosuggest
    #[serde(default)]
    pub suggest: SuggestConfig,

    /// Local storage (last query)
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenWeather API key. When unset, `OPENWEATHER_API_KEY` is used, and
    /// without either the keyless Open-Meteo services are queried instead.
    /// An empty string disables the environment lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather_api_key: Option<String>,

    #[serde(default = "default_openweather_url")]
    pub openweather_url: String,

    #[serde(default = "default_open_meteo_geocoding_url")]
    pub open_meteo_geocoding_url: String,

    #[serde(default = "default_open_meteo_forecast_url")]
    pub open_meteo_forecast_url: String,

    #[serde(default = "default_soilgrids_url")]
    pub soilgrids_url: String,
}

fn default_openweather_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_open_meteo_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

fn default_open_meteo_forecast_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_soilgrids_url() -> String {
    "https://rest.isric.org".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            openweather_api_key: None,
            openweather_url: default_openweather_url(),
            open_meteo_geocoding_url: default_open_meteo_geocoding_url(),
            open_meteo_forecast_url: default_open_meteo_forecast_url(),
            soilgrids_url: default_soilgrids_url(),
        }
    }
}

impl ApiConfig {
    /// Configured key, else the environment variable. A blank result is `None`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.openweather_api_key
            .clone()
            .or_else(|| std::env::var(OPENWEATHER_KEY_ENV).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Retries after the first attempt for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!("Cropwise/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    200
}

fn default_max_backoff_ms() -> u64 {
    2000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Queries shorter than this (after trimming) get no suggestions
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_min_query_len() -> usize {
    2
}

fn default_max_results() -> u32 {
    5
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
            max_results: default_max_results(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the last-query file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cropwise")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load configuration from the user config dir, creating a default file if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating a default file if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated_from(path: &Path) -> Result<(Self, ValidationResult)> {
        let config = Self::load_from(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        if config.api.resolved_api_key().is_none() {
            tracing::info!("No OpenWeather key set, using Open-Meteo for geocoding and forecasts");
        }

        Ok((config, validation))
    }

    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::load_validated_from(&Self::config_path()?)
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        for (field, value) in [
            ("api.openweather_url", &self.api.openweather_url),
            ("api.open_meteo_geocoding_url", &self.api.open_meteo_geocoding_url),
            ("api.open_meteo_forecast_url", &self.api.open_meteo_forecast_url),
            ("api.soilgrids_url", &self.api.soilgrids_url),
        ] {
            validate_url(value, field, &mut result);
        }

        if self.http.timeout_secs == 0 {
            result.add_error("http.timeout_secs", "Timeout must be greater than 0");
        }

        if self.http.max_retries > 10 {
            result.add_warning("http.max_retries", "More than 10 retries per request");
        }

        if self.http.initial_backoff_ms > self.http.max_backoff_ms {
            result.add_warning(
                "http.initial_backoff_ms",
                "Initial backoff exceeds max backoff; every retry waits the max",
            );
        }

        if self.suggest.max_results == 0 {
            result.add_warning("suggest.max_results", "Suggestions disabled (0 results)");
        }

        if self.storage.data_dir.is_file() {
            result.add_error(
                "storage.data_dir",
                format!("Path is not a directory: {}", self.storage.data_dir.display()),
            );
        }

        result
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("cropwise");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.api.soilgrids_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "api.soilgrids_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.api.open_meteo_forecast_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.http.timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "http.timeout_secs"));
    }

    #[test]
    fn test_excessive_retries_is_warning() {
        let mut config = Config::default();
        config.http.max_retries = 50;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "http.max_retries"));
    }

    #[test]
    fn test_missing_key_is_not_a_warning() {
        let mut config = Config::default();
        config.api.openweather_api_key = Some(String::new());
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.is_empty(), "unexpected warnings: {:?}", result.warnings);
    }

    #[test]
    fn test_configured_key_wins() {
        let mut config = Config::default();
        config.api.openweather_api_key = Some("  abc123 ".to_string());
        assert_eq!(config.api.resolved_api_key().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_blank_key_disables_env_lookup() {
        let mut config = Config::default();
        config.api.openweather_api_key = Some(String::new());
        assert_eq!(config.api.resolved_api_key(), None);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.max_retries, 2);
        assert_eq!(config.suggest.min_query_len, 2);
        assert_eq!(config.api.soilgrids_url, "https://rest.isric.org");
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.suggest.max_results, 5);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.http.user_agent, config.http.user_agent);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_load_validated_rejects_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();

        let err = Config::load_validated_from(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
