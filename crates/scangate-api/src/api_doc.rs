//! OpenAPI documentation for the JSON endpoints.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scangate API",
        description = "Virus-scanning file-upload gateway: initiate an upload, \
                       POST the signed form, receive the outcome via notification."
    ),
    paths(
        crate::handlers::initiate::initiate_v1,
        crate::handlers::initiate::initiate_v2,
        crate::handlers::upload::upload,
        crate::handlers::download::download,
        crate::handlers::health::health,
    ),
    components(schemas(
        scangate_core::models::upload::Reference,
        scangate_core::models::upload::InitiateRequestV1,
        scangate_core::models::upload::InitiateRequestV2,
        scangate_core::models::upload::PrepareUploadResponse,
        scangate_core::models::upload::UploadFormTemplate,
        scangate_core::models::upload::SignedFormFields,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "initiate", description = "Upload authorization"),
        (name = "upload", description = "Signed multipart upload ingestion"),
        (name = "download", description = "Stored content retrieval"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
