//! S3-style XML error envelope.
//!
//! Upload-side validation failures render a fixed envelope: one `Error` root
//! with exactly one `Code`, `Message`, `Resource`, and `RequestId` child, in
//! that order, text content only. Clients pattern-match on the literal
//! `Message` strings, so the shape must not vary with the failure that
//! produced it.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use quick_xml::escape::escape;

/// `Resource` value used while no file reference is known (all
/// validation-stage failures).
pub const NO_FILE_REFERENCE: &str = "NoFileReference";

/// The error envelope rendered for upload failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub code: StatusCode,
    pub message: String,
    pub resource: String,
    pub request_id: String,
}

impl ErrorEnvelope {
    /// Envelope for a validation-stage failure (no reference known yet).
    pub fn validation(message: impl Into<String>, request_id: impl Into<String>) -> Self {
        ErrorEnvelope {
            code: StatusCode::BAD_REQUEST,
            message: message.into(),
            resource: NO_FILE_REFERENCE.to_string(),
            request_id: request_id.into(),
        }
    }

    /// Envelope for a collaborator failure after the reference is known.
    pub fn server_fault(
        message: impl Into<String>,
        resource: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        ErrorEnvelope {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            resource: resource.into(),
            request_id: request_id.into(),
        }
    }

    /// Render the envelope. Text content is XML-escaped; the element set and
    /// order are fixed.
    pub fn to_xml(&self) -> String {
        format!(
            "<Error><Code>{}</Code><Message>{}</Message><Resource>{}</Resource><RequestId>{}</RequestId></Error>",
            self.code.as_u16(),
            escape(self.message.as_str()),
            escape(self.resource.as_str()),
            escape(self.request_id.as_str()),
        )
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let status = self.code;
        (
            status,
            [(header::CONTENT_TYPE, "application/xml")],
            self.to_xml(),
        )
            .into_response()
    }
}
