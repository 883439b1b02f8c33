//! Scangate Infrastructure Library
//!
//! Cross-cutting HTTP infrastructure: request correlation and telemetry
//! initialization.

pub mod middleware;
pub mod telemetry;

pub use middleware::request_id::{get_request_id, request_id_middleware, RequestId};
pub use telemetry::init_telemetry;
