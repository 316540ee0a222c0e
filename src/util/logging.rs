//! Tracing subscriber setup.
//!
//! The terminal belongs to the TUI, so log lines always go to a file.

use crate::config::AppConfig;
use crate::{AppError, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber according to the configuration.
///
/// Does nothing when logging is disabled. `RUST_LOG` takes precedence over
/// the configured level.
pub fn init(config: &AppConfig) -> Result<()> {
    if !config.logging_enabled {
        return Ok(());
    }

    if let Some(parent) = config.log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|e| {
            AppError::Config(format!(
                "Failed to open log file {}: {}",
                config.log_file.display(),
                e
            ))
        })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to install logger: {}", e)))?;

    Ok(())
}
