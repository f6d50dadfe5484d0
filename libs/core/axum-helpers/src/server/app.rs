use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{MakeRequestUuidV7, REQUEST_ID_HEADER, cors_layer_from_env, security_headers};
use axum::{Router, http::HeaderName, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wraps `apis` (nested under `/api`) with documentation UIs and the common
/// middleware stack.
///
/// Served documentation:
/// - `/swagger-ui`, `/redoc`, `/rapidoc`, `/scalar`
/// - `/api-docs/openapi.json`
///
/// Middleware, outermost first: request id assignment, tracing, request id
/// propagation, security headers, CORS (see [`cors_layer_from_env`]), compression.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` holds an unparsable origin.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(cors_layer_from_env()?)
        .layer(middleware::from_fn(security_headers))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuidV7));

    Ok(router)
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` bounded by
/// `server_config.shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let shutdown_timeout = server_config.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!(address = %listener.local_addr()?, "Server listening");

    let signals = coordinator.clone();
    tokio::spawn(async move { signals.listen_for_signals().await });

    let waiter = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        waiter.wait().await;
        info!(timeout = ?shutdown_timeout, "Running shutdown cleanup");
        if tokio::time::timeout(shutdown_timeout, cleanup).await.is_err() {
            warn!(timeout = ?shutdown_timeout, "Cleanup exceeded timeout, forcing shutdown");
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { coordinator.wait().await })
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Server encountered an error"));

    cleanup_handle.await.ok();
    info!("Server stopped");
    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi()]
    struct EmptyDoc;

    fn app() -> Router {
        let apis = Router::new().route("/ping", get(|| async { "pong" }));
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            create_router::<EmptyDoc>(apis).unwrap()
        })
    }

    #[tokio::test]
    async fn test_routes_are_nested_under_api() {
        let response = app()
            .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_echoed() {
        let response = app()
            .oneshot(
                Request::get("/api/ping")
                    .header(REQUEST_ID_HEADER, "caller-supplied-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "caller-supplied-id");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_error_body() {
        let response = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
