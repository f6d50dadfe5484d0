//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly with OpenAPI docs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS, request ids and security headers
//! - **[`errors`]**: [`AppError`] and the uniform [`ErrorResponse`] body
//! - **[`extractors`]**: [`ValidatedJson`]
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(router, &server_config, async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::ValidatedJson;
pub use http::{REQUEST_ID_HEADER, cors_layer_from_env, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, ReadyResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
