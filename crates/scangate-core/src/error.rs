//! Error types module
//!
//! This module provides the core error types used throughout the Scangate
//! application. All errors are unified under the `AppError` enum which can
//! represent validation, storage, scanning, and notification failures.

use crate::validation::callback::ProtocolError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like quarantined content
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Scan error: {0}")]
    Scan(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<ProtocolError> for AppError {
    fn from(err: ProtocolError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Static metadata per variant: (http_status, error_code, recoverable, sensitive, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, false, LogLevel::Debug),
        AppError::UnsupportedMediaType(_) => {
            (415, "UNSUPPORTED_MEDIA_TYPE", false, false, LogLevel::Debug)
        }
        AppError::NotFound(_) => (404, "NOT_FOUND", false, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, true, LogLevel::Error),
        AppError::Scan(_) => (500, "SCAN_ERROR", true, true, LogLevel::Error),
        AppError::Notification(_) => (500, "NOTIFICATION_ERROR", true, true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Storage(_) => "Storage",
            AppError::Scan(_) => "Scan",
            AppError::Notification(_) => "Notification",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including the source chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::UnsupportedMediaType(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Scan(_) => "Virus scanning temporarily unavailable".to_string(),
            AppError::Notification(_) => "Failed to dispatch notification".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
