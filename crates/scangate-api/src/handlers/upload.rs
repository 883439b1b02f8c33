//! Upload handler: the multipart ingestion pipeline.
//!
//! A linear state machine with short-circuiting validation:
//! parse form → validate fields → validate file presence → store → scan →
//! build notification → enqueue → respond. Any validation step terminates
//! with the XML error envelope; once storage ran, scan and enqueue always
//! follow, and the verdict never changes the 204 outcome.

use crate::services::ingest::{ingest, AcceptedUpload};
use crate::state::AppState;
use crate::xml::ErrorEnvelope;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use bytes::Bytes;
use scangate_core::models::upload::{FormValidationError, Reference, REQUIRED_FORM_FIELDS};
use scangate_core::ErrorMetadata;
use scangate_infra::RequestId;
use std::collections::HashMap;
use std::sync::Arc;

const FILE_FIELD: &str = "file";
const CALLBACK_URL_FIELD: &str = "x-amz-meta-callback-url";
const KEY_FIELD: &str = "key";

/// The decoded multipart submission: named text fields plus zero-or-one
/// file part.
struct ParsedForm {
    fields: HashMap<String, String>,
    file: Option<FilePart>,
}

struct FilePart {
    content_type: String,
    data: Bytes,
}

/// Decode the multipart body. Any decode failure (including a repeated file
/// part or a non-UTF-8 text field) is a parse failure, handled by the caller
/// like a field validation error.
async fn parse_form(mut multipart: Multipart) -> Result<ParsedForm, String> {
    let mut fields = HashMap::new();
    let mut file: Option<FilePart> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read multipart: {}", e.body_text()))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == FILE_FIELD {
            if file.is_some() {
                return Err(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                );
            }
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| format!("Failed to read file data: {}", e.body_text()))?;
            file = Some(FilePart { content_type, data });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| format!("Failed to read field '{}': {}", field_name, e.body_text()))?;
            fields.insert(field_name, value);
        }
    }

    Ok(ParsedForm { fields, file })
}

/// Every required signed-form field must be present; absences are reported
/// together, in the order the fields are declared required.
fn validate_required_fields(form: &ParsedForm) -> Vec<FormValidationError> {
    REQUIRED_FORM_FIELDS
        .iter()
        .filter(|name| !form.fields.contains_key(**name))
        .map(|name| FormValidationError::required(name))
        .collect()
}

fn field_errors_message(errors: &[FormValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Accept a signed multipart upload
#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 204, description = "File accepted; outcome is delivered via notification"),
        (status = 400, description = "Form validation failure (XML error envelope)", body = String, content_type = "application/xml"),
        (status = 500, description = "Collaborator failure (XML error envelope)", body = String, content_type = "application/xml")
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    multipart: Multipart,
) -> Response {
    // ParseForm
    let form = match parse_form(multipart).await {
        Ok(form) => form,
        Err(message) => {
            tracing::debug!(error = %message, "Rejected malformed multipart upload");
            return ErrorEnvelope::validation(message, request_id).into_response();
        }
    };

    // ValidateFields
    let field_errors = validate_required_fields(&form);
    if !field_errors.is_empty() {
        let message = field_errors_message(&field_errors);
        tracing::debug!(message = %message, "Rejected upload with missing form fields");
        return ErrorEnvelope::validation(message, request_id).into_response();
    }

    // ValidateFilePresence
    let Some(file) = form.file else {
        tracing::debug!("Rejected upload without file part");
        return ErrorEnvelope::validation("'file' field not found", request_id).into_response();
    };

    // The signed form's `key` is the upload reference; the callback URL is
    // taken from the form as-is (protocol-checked at initiate time only).
    let reference = Reference::from(form.fields[KEY_FIELD].clone());
    let callback_url = form.fields[CALLBACK_URL_FIELD].clone();

    let accepted = AcceptedUpload {
        reference: reference.clone(),
        callback_url,
        content_type: file.content_type,
        data: file.data,
    };

    // Store → Scan → Enqueue
    match ingest(&state, accepted).await {
        Ok(_verdict) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ErrorEnvelope::server_fault(
            err.client_message(),
            reference.to_string(),
            request_id,
        )
        .into_response(),
    }
}
