//! Scangate API Library
//!
//! This crate provides the HTTP surface of the upload gateway: the initiate
//! and upload endpoints, error rendering, and application setup.

// Module declarations
mod api_doc;
mod handlers;
mod xml;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use services::authorization::UploadAuthorizationIssuer;
