//! Configuration management module
//!
//! Handles loading and validation of the client configuration.

use crate::{AppError, Result, APP_NAME, CONFIG_ENV_VAR, CONFIG_FILE, LOG_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the REST backend, without a trailing slash
    pub backend_url: String,
    /// Whether log output is written at all
    pub logging_enabled: bool,
    /// Log file location
    pub log_file: PathBuf,
    /// Default tracing filter (overridden by RUST_LOG)
    pub log_level: String,
    /// Background track played in a loop
    pub main_track: PathBuf,
    /// Whether background music starts playing
    pub audio_enabled: bool,
    /// Timeout for a single backend request
    pub request_timeout_secs: u64,
    /// Banner animation tick
    pub tick_rate_ms: u64,
    /// Ask for confirmation before "esc" quits
    pub confirm_exit: bool,
    /// Operator whose user id is stamped on newly created quizzes
    pub creator_name: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080".to_string(),
            logging_enabled: true,
            log_file: default_log_path(),
            log_level: "info".to_string(),
            main_track: PathBuf::from("main.mp3"),
            audio_enabled: true,
            request_timeout_secs: 10,
            tick_rate_ms: 1000,
            confirm_exit: false,
            creator_name: None,
        }
    }
}

impl AppConfig {
    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err(AppError::Config("backend_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "backend_url must start with http:// or https://, got {}",
                url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.tick_rate_ms == 0 {
            return Err(AppError::Config("tick_rate_ms must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Timeout applied to each backend command
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Banner animation interval
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Load configuration from `$LETSQUIZ_CONFIG` or the standard location.
    /// Returns the default configuration if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => Self::config_file_path()?,
        };
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        config.backend_url = config.backend_url.trim().trim_end_matches('/').to_string();

        config.validate()?;

        Ok(config)
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/letsquiz/letsquiz.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            AppError::Config("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME).join(LOG_FILE))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE))
}
