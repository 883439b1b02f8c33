//! Upload authorization models: references, constraints, and the signed form
//! template a client must replay verbatim when POSTing its file.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Opaque identifier correlating an initiate call to its eventual upload.
///
/// Unique per initiate call, immutable once issued. The signed form carries it
/// as the `key` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Reference(pub String);

impl Reference {
    /// Allocate a fresh, unique reference.
    pub fn generate() -> Self {
        Reference(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Reference {
    fn from(value: String) -> Self {
        Reference(value)
    }
}

/// The signed form fields, in the order the upload endpoint declares them
/// required. Serialization preserves declaration order, so the JSON the
/// client receives lists them exactly as the form contract expects them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SignedFormFields {
    #[serde(rename = "X-Amz-Algorithm")]
    pub algorithm: String,
    #[serde(rename = "X-Amz-Credential")]
    pub credential: String,
    #[serde(rename = "X-Amz-Date")]
    pub date: String,
    pub policy: String,
    #[serde(rename = "X-Amz-Signature")]
    pub signature: String,
    pub acl: String,
    pub key: String,
    #[serde(rename = "x-amz-meta-callback-url")]
    pub callback_url: String,
}

/// Names of the form fields the upload endpoint requires, in declaration
/// order. Validation failures are reported in this order.
pub const REQUIRED_FORM_FIELDS: &[&str] = &[
    "X-Amz-Algorithm",
    "X-Amz-Credential",
    "X-Amz-Date",
    "policy",
    "X-Amz-Signature",
    "acl",
    "key",
    "x-amz-meta-callback-url",
];

/// One rejected form field: the field name plus the error code describing
/// why. Rendered on the wire as `FormError(<field>,List(<code>),List())`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValidationError {
    pub field: String,
    pub code: String,
}

impl FormValidationError {
    pub fn required(field: &str) -> Self {
        FormValidationError {
            field: field.to_string(),
            code: "error.required".to_string(),
        }
    }
}

impl Display for FormValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "FormError({},List({}),List())", self.field, self.code)
    }
}

/// Where and how to POST the file: target URL plus the fields to echo back.
/// Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadFormTemplate {
    pub href: String,
    pub fields: SignedFormFields,
}

/// Full initiate result: a reference paired with its signed form template.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrepareUploadResponse {
    pub reference: Reference,
    pub upload_request: UploadFormTemplate,
}

/// Validated upload constraints handed to the authorization issuer.
///
/// Invariant: `minimum_file_size <= maximum_file_size`; `callback_url` has
/// already passed the protocol allow-list.
#[derive(Debug, Clone)]
pub struct UploadRequestConstraints {
    pub minimum_file_size: u64,
    pub maximum_file_size: u64,
    pub expected_mime_type: String,
    pub callback_url: String,
    pub success_redirect: Option<String>,
    pub error_redirect: Option<String>,
}

/// V1 initiate request body.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_size_bounds))]
pub struct InitiateRequestV1 {
    pub callback_url: String,
    pub minimum_file_size: u64,
    pub maximum_file_size: u64,
    pub expected_mime_type: String,
}

/// V2 initiate request body: V1 plus optional redirect targets. The redirects
/// are carried into the signed policy but never protocol-validated.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_size_bounds_v2))]
pub struct InitiateRequestV2 {
    pub callback_url: String,
    pub minimum_file_size: u64,
    pub maximum_file_size: u64,
    pub expected_mime_type: String,
    #[serde(default)]
    pub success_redirect: Option<String>,
    #[serde(default)]
    pub error_redirect: Option<String>,
}

fn check_size_bounds(minimum: u64, maximum: u64) -> Result<(), ValidationError> {
    if minimum > maximum {
        let mut err = ValidationError::new("size_bounds");
        err.message = Some("minimumFileSize must not exceed maximumFileSize".into());
        return Err(err);
    }
    Ok(())
}

fn validate_size_bounds(request: &InitiateRequestV1) -> Result<(), ValidationError> {
    check_size_bounds(request.minimum_file_size, request.maximum_file_size)
}

fn validate_size_bounds_v2(request: &InitiateRequestV2) -> Result<(), ValidationError> {
    check_size_bounds(request.minimum_file_size, request.maximum_file_size)
}

impl From<InitiateRequestV1> for UploadRequestConstraints {
    fn from(request: InitiateRequestV1) -> Self {
        UploadRequestConstraints {
            minimum_file_size: request.minimum_file_size,
            maximum_file_size: request.maximum_file_size,
            expected_mime_type: request.expected_mime_type,
            callback_url: request.callback_url,
            success_redirect: None,
            error_redirect: None,
        }
    }
}

impl From<InitiateRequestV2> for UploadRequestConstraints {
    fn from(request: InitiateRequestV2) -> Self {
        UploadRequestConstraints {
            minimum_file_size: request.minimum_file_size,
            maximum_file_size: request.maximum_file_size,
            expected_mime_type: request.expected_mime_type,
            callback_url: request.callback_url,
            success_redirect: request.success_redirect,
            error_redirect: request.error_redirect,
        }
    }
}
