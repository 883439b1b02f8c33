//! Initiate handlers: authorize a future upload and return the signed form
//! template. Two protocol versions share one algorithm; V2 additionally
//! accepts optional success/error redirects (carried into the policy, never
//! protocol-checked).

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use scangate_core::{
    validate_callback_url, models::upload::{InitiateRequestV1, InitiateRequestV2},
    PrepareUploadResponse, UploadRequestConstraints,
};
use std::sync::Arc;

/// Shared initiate algorithm: protocol-guard the callback URL, then issue.
///
/// The guard short-circuits: on a rejected callback URL the issuer never
/// runs, so no reference is allocated for the failed request.
fn initiate(
    state: &AppState,
    constraints: UploadRequestConstraints,
) -> Result<Json<PrepareUploadResponse>, HttpAppError> {
    validate_callback_url(&constraints.callback_url)
        .map_err(scangate_core::AppError::from)?;

    let response = state.issuer.prepare_upload(&constraints);
    tracing::info!(
        reference = %response.reference,
        callback_url = %constraints.callback_url,
        "Upload authorized"
    );
    Ok(Json(response))
}

/// Initiate an upload (protocol V1)
#[utoipa::path(
    post,
    path = "/v1/initiate",
    tag = "initiate",
    request_body = InitiateRequestV1,
    responses(
        (status = 200, description = "Upload authorized", body = PrepareUploadResponse),
        (status = 400, description = "Invalid request or callback URL", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "initiate_v1"))]
pub async fn initiate_v1(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<InitiateRequestV1>,
) -> Result<Json<PrepareUploadResponse>, HttpAppError> {
    initiate(&state, request.into())
}

/// Initiate an upload (protocol V2)
#[utoipa::path(
    post,
    path = "/v2/initiate",
    tag = "initiate",
    request_body = InitiateRequestV2,
    responses(
        (status = 200, description = "Upload authorized", body = PrepareUploadResponse),
        (status = 400, description = "Invalid request or callback URL", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "initiate_v2"))]
pub async fn initiate_v2(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<InitiateRequestV2>,
) -> Result<Json<PrepareUploadResponse>, HttpAppError> {
    initiate(&state, request.into())
}
