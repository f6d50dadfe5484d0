//! Products API - REST server for the product catalog

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::{mongodb::connect_with_retry, RetryPolicy};
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

    info!(
        url = %database::mongodb::redact_url(config.mongodb.url()),
        database = config.mongodb.database(),
        "Connecting to MongoDB"
    );
    let mongo_client = connect_with_retry(&config.mongodb, RetryPolicy::default()).await?;
    let db = mongo_client.database(config.mongodb.database());

    let state = AppState {
        config: config.clone(),
        mongo_client,
        db,
    };

    api::products::init_indexes(&state).await?;

    let router = create_router::<openapi::ApiDoc>(api::routes(&state))?
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.mongo_client.clone()));

    info!(
        port = state.config.server.port,
        collection = %state.config.products.collection,
        "Starting Products API"
    );

    let client = state.mongo_client.clone();
    create_production_app(router, &state.config.server, async move {
        info!("Shutting down: closing MongoDB connections");
        client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await?;

    info!("Products API shutdown complete");
    Ok(())
}
