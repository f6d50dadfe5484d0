use mongodb::{Client, bson::doc};
use serde::Serialize;
use std::time::Instant;

/// Outcome of a readiness probe against MongoDB
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

pub async fn check_health(client: &Client) -> bool {
    check_health_detailed(client).await.healthy
}

/// Pings the `admin` database and reports latency plus any error text.
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let outcome = client.database("admin").run_command(doc! { "ping": 1 }).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires a reachable MongoDB
    async fn test_check_health_detailed() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let status = check_health_detailed(&client).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
    }
}
