//! Validation modules

pub mod callback;

pub use callback::{validate_callback_url, ProtocolError};
