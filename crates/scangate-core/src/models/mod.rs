//! Domain models

pub mod notification;
pub mod scan;
pub mod upload;

pub use notification::NotificationEvent;
pub use scan::ScanVerdict;
pub use upload::{
    FormValidationError, InitiateRequestV1, InitiateRequestV2, PrepareUploadResponse, Reference,
    SignedFormFields, UploadFormTemplate, UploadRequestConstraints, REQUIRED_FORM_FIELDS,
};
