//! Products API routes

use axum::{Extension, Router};
use domain_products::{handlers, RequestTimeout};

use crate::state::AppState;

/// Product endpoints; every request carries the configured deadline.
pub fn router(state: &AppState) -> Router {
    handlers::router(state.product_service())
        .layer(Extension(RequestTimeout(state.config.products.request_timeout)))
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    state.repository().init_indexes().await?;
    Ok(())
}
