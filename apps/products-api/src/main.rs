//! Products API - REST server for the product catalog

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tower_http::services::ServeDir;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(database = config.mongodb.database(), "Connecting to MongoDB");

    let mongo_client = database::mongodb::connect_from_config_with_retry(
        &config.mongodb,
        Some(config.retry.clone()),
    )
    .await?;

    let state = AppState::new(config, mongo_client);
    info!(
        "Successfully connected to MongoDB database: {}",
        state.db.name()
    );

    api::init_indexes(&state).await?;

    let uploads = &state.config.uploads;
    tokio::fs::create_dir_all(&uploads.dir).await?;
    info!(
        "Serving uploads from {} at {}",
        uploads.dir.display(),
        uploads.public_path
    );

    let router = create_router::<openapi::ApiDoc>(api::routes(&state))?;
    let app = router
        .nest_service(
            uploads.public_path.trim_end_matches('/'),
            ServeDir::new(&uploads.dir),
        )
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!("Starting Products API on port {}", state.config.server.port);

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
