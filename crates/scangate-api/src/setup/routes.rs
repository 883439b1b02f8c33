//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use scangate_core::Config;
use scangate_infra::request_id_middleware;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state.config)?;
    let body_limit = state.config.max_file_size_bytes;

    // Server-level concurrency limit to protect against resource exhaustion
    // under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let rapidoc: Router =
        RapiDoc::with_openapi("/api/openapi.json", ApiDoc::openapi()).path("/docs").into();

    let app = Router::new()
        .route("/v1/initiate", post(handlers::initiate::initiate_v1))
        .route("/v2/initiate", post(handlers::initiate::initiate_v2))
        .route("/upload", post(handlers::upload::upload))
        .route("/download/{reference}", get(handlers::download::download))
        .route("/health", get(handlers::health::health))
        .with_state(state)
        .merge(rapidoc)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        // Multipart bodies are read through axum's extractor, so both limits
        // must admit the configured maximum
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit));

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", origin, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };
    Ok(cors)
}
