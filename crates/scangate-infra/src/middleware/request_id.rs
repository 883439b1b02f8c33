use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

/// Request ID extension type
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Request ID middleware
/// Honors an inbound X-Request-ID (for tracing across services), otherwise
/// generates one, and makes it available to:
/// - Response headers (X-Request-ID)
/// - Request extensions (for handlers and error envelopes)
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("X-Request-ID")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("X-Request-ID", header_value);
    }

    response
}

/// Extract the request ID from request extensions
pub fn get_request_id(request: &Request) -> Option<String> {
    request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
}
