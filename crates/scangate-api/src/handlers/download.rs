//! Download handler: serves stored content for a reference. Notification
//! events point their `downloadUrl` here.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use scangate_core::AppError;
use std::sync::Arc;

/// Fetch a stored file by its reference
#[utoipa::path(
    get,
    path = "/download/{reference}",
    tag = "download",
    params(("reference" = String, Path, description = "Upload reference")),
    responses(
        (status = 200, description = "Stored file content"),
        (status = 404, description = "Unknown reference", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download"))]
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(reference): Path<String>,
) -> Result<Response, HttpAppError> {
    let stored = state
        .storage
        .get(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No stored file for reference {}", reference)))?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, stored.content_type.as_str())
        .body(Body::from(stored.bytes))
        .map_err(|e| HttpAppError::from(AppError::Internal(e.to_string())))?;

    Ok(response)
}
