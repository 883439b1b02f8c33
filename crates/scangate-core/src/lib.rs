//! Scangate Core Library
//!
//! This crate provides the core domain models, error types, configuration, and
//! validation shared across all Scangate components.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::notification::NotificationEvent;
pub use models::scan::ScanVerdict;
pub use models::upload::{
    FormValidationError, PrepareUploadResponse, Reference, SignedFormFields, UploadFormTemplate,
    UploadRequestConstraints,
};
pub use validation::callback::{validate_callback_url, ProtocolError};
