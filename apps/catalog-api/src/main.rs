use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod seed;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    // Startup is the only place store access is retried
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb).await?;

    let state = AppState::new(config, mongo_client);

    info!(
        database = state.config.mongodb.database(),
        collection = %state.config.catalog.collection,
        "Connected to MongoDB"
    );

    state.products.repository().init_indexes().await?;

    if state.config.catalog.seed_on_startup {
        seed::seed_catalog(&state.products, &state.config.catalog.seed_file).await?;
    } else {
        info!("Seeding disabled, keeping existing catalog");
    }

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api::routes(&state))?;

    info!("Starting Product Catalog API with production-ready shutdown (30s timeout)");

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        router,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Product Catalog API shutdown complete");
    Ok(())
}
