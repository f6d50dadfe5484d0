//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Routes mounted under `/api`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/v1/product", products::router(state))
}
