mod api_doc;
mod error;
mod handlers;
mod services;
mod setup;
mod state;
mod xml;

use scangate_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    scangate_infra::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Load configuration (fails fast on misconfiguration)
    let config = Config::from_env()?;

    // Initialize the application (collaborators, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
