//! LetsQuiz - terminal quiz authoring client
//!
//! A TUI application that lets an operator sign in, browse a menu and
//! author quizzes (metadata, then one form per question with its answers)
//! against a remote REST backend, with muteable background music.

pub mod app;
pub mod audio;
pub mod client;
pub mod config;
pub mod models;
pub mod util;

/// Crate-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A form field failed local validation
    #[error("{0}")]
    Validation(String),
    /// The HTTP request itself failed (connection, DNS, TLS)
    #[error("Request failed: {0}")]
    Request(String),
    /// The backend answered with a non-success status code
    #[error("Backend error ({status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
    /// The response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),
    /// The requested resource does not exist remotely
    #[error("Not found: {0}")]
    NotFound(String),
    /// A category or creator name did not resolve to an id
    #[error("No match for '{0}'")]
    LookupNotFound(String),
    /// A backend call did not finish within the request timeout
    #[error("Timed out: {0}")]
    Timeout(String),
    /// Configuration validation or parsing error
    #[error("Configuration error: {0}")]
    Config(String),
    /// Terminal setup or rendering error
    #[error("TUI error: {0}")]
    Tui(String),
    /// Audio device or decoding error
    #[error("Audio error: {0}")]
    Audio(String),
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::Request(err.to_string())
        }
    }
}

/// Result type alias for LetsQuiz operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Error handling utilities
pub mod error {
    use super::{AppError, Result};
    use std::time::Duration;
    use tokio::time::sleep;

    /// Retry configuration for transient operations
    #[derive(Debug, Clone)]
    pub struct RetryConfig {
        /// Maximum number of attempts
        pub max_attempts: usize,
        /// Initial delay between retries
        pub initial_delay: Duration,
        /// Multiplier for exponential backoff
        pub backoff_multiplier: f64,
        /// Maximum delay between retries
        pub max_delay: Duration,
    }

    impl Default for RetryConfig {
        fn default() -> Self {
            Self {
                max_attempts: 3,
                initial_delay: Duration::from_millis(200),
                backoff_multiplier: 2.0,
                max_delay: Duration::from_secs(2),
            }
        }
    }

    /// Retry a fallible async operation with exponential backoff.
    ///
    /// Only use this for idempotent calls (GET, PUT by id).
    pub async fn retry_async<F, Fut, T>(operation: F, config: RetryConfig) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut delay = config.initial_delay;
        let mut last_error = None;

        for attempt in 0..config.max_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    let retryable = is_retryable_error(&err);
                    tracing::debug!(attempt, error = %err, retryable, "Operation failed");
                    last_error = Some(err);
                    if !retryable {
                        break;
                    }

                    // Don't sleep after the last attempt
                    if attempt + 1 < config.max_attempts {
                        sleep(delay).await;
                        delay = std::cmp::min(
                            Duration::from_millis(
                                (delay.as_millis() as f64 * config.backoff_multiplier) as u64,
                            ),
                            config.max_delay,
                        );
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AppError::Request("Retry failed with no error".to_string())))
    }

    /// Check if an error is worth retrying
    pub fn is_retryable_error(error: &AppError) -> bool {
        match error {
            AppError::Request(_) | AppError::Timeout(_) => true,
            AppError::Status { status, .. } => *status >= 500,
            AppError::Io(io_err) => matches!(
                io_err.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::ConnectionReset
            ),
            _ => false,
        }
    }

    /// Convert error to a short operator-facing message
    pub fn user_friendly_message(error: &AppError) -> String {
        match error {
            AppError::Validation(msg) => msg.clone(),
            AppError::Request(_) | AppError::Timeout(_) => {
                "Backend unreachable. Changes are kept locally; press Ctrl+R to retry.".to_string()
            }
            AppError::Status { status, .. } => {
                format!("Backend rejected the request ({}). Press Ctrl+R to retry.", status)
            }
            AppError::Decode(_) => "Backend sent an unexpected response.".to_string(),
            AppError::LookupNotFound(name) => {
                format!("'{}' does not exist on the backend.", name)
            }
            _ => error.to_string(),
        }
    }
}

// Common constants
pub const APP_NAME: &str = "letsquiz";
pub const CONFIG_FILE: &str = "letsquiz.toml";
pub const CONFIG_ENV_VAR: &str = "LETSQUIZ_CONFIG";
pub const LOG_FILE: &str = "letsquiz.log";
