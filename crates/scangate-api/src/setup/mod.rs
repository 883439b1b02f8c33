//! Application setup and initialization
//!
//! All application initialization logic lives here rather than in main.rs,
//! for organization and testability.

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use scangate_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    let state = services::setup_services(config).await?;

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
