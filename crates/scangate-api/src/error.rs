//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types that implement `Into<AppError>`) for errors and
//! `.map_err(Into::into)` so they become `HttpAppError` and render consistently
//! (status, body, logging). The upload endpoint is the exception: its error
//! terminal states render the XML envelope from `crate::xml` instead.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scangate_core::{AppError, ErrorMetadata, LogLevel};
use scangate_services::{NotifyError, ScanError};
use scangate_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from scangate-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Convert JSON body extraction failures into our error taxonomy: a body that
/// is not JSON at all (wrong/missing content type) is 415 Unsupported Media
/// Type; a JSON body that fails to deserialize into the expected schema is 400.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        let app = match &rejection {
            JsonRejection::MissingJsonContentType(_) => AppError::UnsupportedMediaType(
                "Expected request with `Content-Type: application/json`".to_string(),
            ),
            _ => AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text())),
        };
        HttpAppError(app)
    }
}

/// JSON body extractor that returns our ErrorResponse format on failure and
/// runs `validator::Validate` on the deserialized value.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        inner
            .validate()
            .map_err(|e| HttpAppError(AppError::InvalidInput(format!("Validation error: {}", e))))?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Hide details in production and for sensitive errors
        let details = if is_production_env() || app_error.is_sensitive() {
            None
        } else {
            Some(app_error.detailed_message())
        };

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
        });

        (status, body).into_response()
    }
}

// Convert collaborator errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<ScanError> for HttpAppError {
    fn from(err: ScanError) -> Self {
        HttpAppError(AppError::Scan(err.to_string()))
    }
}

impl From<NotifyError> for HttpAppError {
    fn from(err: NotifyError) -> Self {
        HttpAppError(AppError::Notification(err.to_string()))
    }
}
