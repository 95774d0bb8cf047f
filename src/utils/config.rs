//! Configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Endpoint used when neither the config file nor the environment overrides it.
pub const DEFAULT_BASE_URL: &str = "https://api.ai71.ai/v1";
/// Model used when the config file does not name one.
pub const DEFAULT_MODEL: &str = "tiiuae/falcon-11b";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM service configuration.
    pub llm: LlmSettings,
    /// Data source configuration.
    pub data: DataSettings,
}

/// LLM service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API base URL; falls back to the environment, then the default.
    pub base_url: Option<String>,
    /// Environment variable consulted when `base_url` is unset.
    pub base_url_env: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// API key; can also come from the environment.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,
    /// Temperature for generation.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retries per request after the first failed attempt.
    pub max_retries: u32,
    /// Maximum in-flight news-analysis requests.
    pub news_concurrency: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            base_url_env: "AI71_BASE_URL".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_key_env: "AI71_API_KEY".to_string(),
            temperature: 0.3,
            max_tokens: 2000,
            timeout_ms: 30_000,
            max_retries: 2,
            news_concurrency: 1,
        }
    }
}

impl LlmSettings {
    /// Get the API key from config or the environment.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
    }

    /// Resolve the base URL from config, environment, or the default.
    pub fn resolve_base_url(&self) -> String {
        self.base_url
            .clone()
            .or_else(|| std::env::var(&self.base_url_env).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}

/// Data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Path to the historical shipment CSV.
    pub csv_path: String,
    /// Optional file of news headlines, one per line. When unset the built-in
    /// mock headlines are used.
    pub headlines_file: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            csv_path: "supply_chain_data.csv".to_string(),
            headlines_file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            data: DataSettings::default(),
        }
    }
}

impl Config {
    /// Read configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::File(format!("{}: {}", path.as_ref().display(), e)))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&path, content)
            .map_err(|e| ConfigError::File(format!("{}: {}", path.as_ref().display(), e)))
    }

    /// Write a sample configuration file with the defaults.
    pub fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        Config::default().save_to_file(path)
    }
}

/// Load configuration from a file, or fall back to defaults when the file
/// does not exist.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    if path.as_ref().exists() {
        Config::from_file(path)
    } else {
        Ok(Config::default())
    }
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API key in the config file or the environment.
    #[error("API key not configured: set llm.api_key or the {0} environment variable")]
    MissingApiKey(String),
    /// File I/O error.
    #[error("Config file error: {0}")]
    File(String),
    /// Parse error.
    #[error("Config parse error: {0}")]
    Parse(String),
    /// Serialization error.
    #[error("Config serialize error: {0}")]
    Serialize(String),
    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
