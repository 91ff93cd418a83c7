//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Gemini generation service configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Never written back out; supplied via config source or environment only.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_timeout() -> u64 {
    120000
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key: None,
            timeout_ms: default_timeout(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl GeminiConfig {
    /// Resolve the API key: configured value first, then the well-known
    /// environment variables.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Client-enforced input limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    #[serde(default = "default_max_prompt_words")]
    pub max_prompt_words: usize,
    /// Transport cap for upload bodies; sits above `max_file_size_mb` so the
    /// size alert is produced by the studio rather than the HTTP layer.
    #[serde(default = "default_max_upload_body_mb")]
    pub max_upload_body_mb: u64,
}

fn default_max_file_size_mb() -> u64 {
    20
}

fn default_max_prompt_words() -> usize {
    100
}

fn default_max_upload_body_mb() -> u64 {
    64
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            max_prompt_words: default_max_prompt_words(),
            max_upload_body_mb: default_max_upload_body_mb(),
        }
    }
}

impl LimitsConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn max_upload_body_bytes(&self) -> usize {
        (self.max_upload_body_mb.max(self.max_file_size_mb + 1) * 1024 * 1024) as usize
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_download_dir")]
    pub download_dir: String,
    #[serde(default = "default_download_file_name")]
    pub download_file_name: String,
    #[serde(default = "default_upload_retention")]
    pub upload_retention_secs: u64,
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_download_dir() -> String {
    "./downloads".to_string()
}

fn default_download_file_name() -> String {
    "ai_quang_cao_4k.png".to_string()
}

fn default_upload_retention() -> u64 {
    86400
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            download_dir: default_download_dir(),
            download_file_name: default_download_file_name(),
            upload_retention_secs: default_upload_retention(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("limits.max_file_size_mb", 20)?
            .set_default("limits.max_prompt_words", 100)?
            .add_source(File::with_name(path.as_ref().to_str().unwrap_or("config/default")).required(false))
            // Override with environment variables (prefixed with AD_STUDIO__)
            .add_source(
                Environment::with_prefix("AD_STUDIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(config_error("Server port cannot be 0"));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(config_error("limits.max_file_size_mb must be greater than 0"));
        }
        if self.limits.max_prompt_words == 0 {
            return Err(config_error("limits.max_prompt_words must be greater than 0"));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(config_error("gemini.model cannot be empty"));
        }
        if !self.gemini.api_base.starts_with("http://") && !self.gemini.api_base.starts_with("https://") {
            return Err(config_error(&format!(
                "gemini.api_base '{}' must be an http(s) URL",
                self.gemini.api_base
            )));
        }
        if self.storage.download_file_name.trim().is_empty()
            || self.storage.download_file_name.contains(['/', '\\'])
        {
            return Err(config_error(
                "storage.download_file_name must be a plain, non-empty file name",
            ));
        }

        Ok(())
    }
}

fn config_error(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gemini: GeminiConfig::default(),
            limits: LimitsConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
