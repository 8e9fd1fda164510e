use thiserror::Error;

/// Centralized error types for the application
///
/// Uses `thiserror` for automatic error conversion and display formatting.
/// Handlers log these and answer the user with a short text; nothing is retried.
///
/// # Example
///
/// ```no_run
/// use sharecore::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[cfg(feature = "telegram")]
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid user input (timer values, codes)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown access code
    #[error("Code not found: {0}")]
    NotFound(String),

    /// Access code past its expiry
    #[error("Code expired: {0}")]
    Expired(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
