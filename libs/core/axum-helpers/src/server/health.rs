use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use core_config::AppInfo;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckStatus {
    pub healthy: bool,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadyResponse {
    pub ready: bool,
    pub checks: BTreeMap<String, CheckStatus>,
}

/// A dependency probe; `Err` carries the reason it failed.
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Runs `checks` concurrently. 200 when all pass, 503 otherwise.
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> (StatusCode, Json<ReadyResponse>) {
    let timed = checks.into_iter().map(|(name, check)| async move {
        let start = Instant::now();
        let outcome = check.await;
        (name, outcome, start.elapsed().as_millis() as u64)
    });

    let mut ready = true;
    let mut statuses = BTreeMap::new();
    for (name, outcome, response_time_ms) in join_all(timed).await {
        let message = match outcome {
            Ok(()) => None,
            Err(reason) => {
                tracing::error!(check = name, reason = %reason, "Readiness check failed");
                ready = false;
                Some(reason)
            }
        };
        statuses.insert(
            name.to_string(),
            CheckStatus {
                healthy: message.is_none(),
                response_time_ms,
                message,
            },
        );
    }

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ReadyResponse {
            ready,
            checks: statuses,
        }),
    )
}

async fn health_handler(State(app): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        name: app.name.to_string(),
        version: app.version.to_string(),
    })
}

/// Liveness endpoint at `/health`; always 200 while the process serves.
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_all_checks_pass() {
        let mongodb: HealthCheckFuture<'_> = Box::pin(async { Ok(()) });
        let (status, Json(body)) = run_health_checks(vec![("mongodb", mongodb)]).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.ready);
        assert!(body.checks["mongodb"].healthy);
    }

    #[tokio::test]
    async fn test_one_failing_check_is_unavailable() {
        let mongodb: HealthCheckFuture<'_> =
            Box::pin(async { Err("server selection timeout".to_string()) });
        let disk: HealthCheckFuture<'_> = Box::pin(async { Ok(()) });
        let (status, Json(body)) = run_health_checks(vec![("mongodb", mongodb), ("disk", disk)]).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.ready);
        assert_eq!(
            body.checks["mongodb"].message.as_deref(),
            Some("server selection timeout")
        );
        assert!(body.checks["disk"].healthy);
    }

    #[tokio::test]
    async fn test_health_router_reports_app_info() {
        let app = health_router(AppInfo {
            name: "products-api",
            version: "1.2.3",
        });
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.name, "products-api");
        assert_eq!(body.version, "1.2.3");
    }
}
