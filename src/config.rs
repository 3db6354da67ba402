//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::endpoints::normalize_api_base;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub reports: ReportsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No timeout unless set
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

impl ApiConfig {
    /// Base URL with the `/api` suffix guaranteed
    pub fn normalized_base_url(&self) -> String {
        normalize_api_base(&self.base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

/// Where session tokens are persisted
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_file")]
    pub token_file: String,
}

fn default_token_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("chemviz").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./.chemviz_session.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

/// PDF report downloads
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    #[serde(default = "default_report_dir")]
    pub output_dir: String,
}

fn default_report_dir() -> String {
    dirs::download_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("chemviz").join("config.toml")),
            Some(PathBuf::from("/etc/chemviz/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `CHEMVIZ_*` overrides from any key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("CHEMVIZ_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("CHEMVIZ_API_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = Some(secs);
            }
        }

        if let Some(file) = lookup("CHEMVIZ_SESSION_FILE") {
            self.session.token_file = file;
        }

        if let Some(dir) = lookup("CHEMVIZ_REPORT_DIR") {
            self.reports.output_dir = dir;
        }

        if let Some(level) = lookup("CHEMVIZ_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CHEMVIZ_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}

impl SessionConfig {
    pub fn token_path(&self) -> PathBuf {
        expand_path(&self.token_file)
    }
}

impl ReportsConfig {
    pub fn output_path(&self) -> PathBuf {
        expand_path(&self.output_dir)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Chemviz Configuration
#
# Environment variables override these settings:
# - CHEMVIZ_API_URL
# - CHEMVIZ_API_TIMEOUT
# - CHEMVIZ_SESSION_FILE
# - CHEMVIZ_REPORT_DIR
# - CHEMVIZ_LOG_LEVEL
# - CHEMVIZ_LOG_FORMAT

[api]
# Dataset API base URL; "/api" is appended when missing
base_url = "http://localhost:8000/api"

# Request timeout in seconds (no timeout when unset)
# request_timeout_secs = 30

[session]
# File holding the access and refresh tokens
token_file = "~/.local/share/chemviz/session.json"

[reports]
# Directory PDF reports are written to
output_dir = "~/Downloads"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
