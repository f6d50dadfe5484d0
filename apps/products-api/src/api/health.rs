//! Readiness endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture, ReadyResponse};
use database::mongodb::check_health_detailed;
use mongodb::Client;

async fn ready(State(client): State<Client>) -> (StatusCode, Json<ReadyResponse>) {
    let mongodb: HealthCheckFuture<'_> = Box::pin(async {
        let status = check_health_detailed(&client).await;
        if status.healthy {
            Ok(())
        } else {
            Err(status
                .message
                .unwrap_or_else(|| "MongoDB ping failed".to_string()))
        }
    });

    run_health_checks(vec![("mongodb", mongodb)]).await
}

/// `/ready`: 200 while MongoDB answers pings, 503 otherwise
pub fn router(client: Client) -> Router {
    Router::new().route("/ready", get(ready)).with_state(client)
}
