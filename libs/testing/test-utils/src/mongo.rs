//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that runs a MongoDB container for testing.

use mongodb::{Client, Database};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;
use uuid::Uuid;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped. Each
/// call to [`database`](Self::database) hands out a fresh, uniquely named
/// database so tests sharing a container stay isolated.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.database();
/// let names = db.list_collection_names().await.unwrap();
/// assert!(names.is_empty());
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
    pub connection_string: String,
}

impl TestMongo {
    /// Create a new test MongoDB instance
    ///
    /// Uses the MongoDB 7 image, which supports `$geoNear` on `2dsphere` indexes.
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}", host_port);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to create MongoDB client");

        tracing::info!(port = host_port, "Test MongoDB ready (mongo:7)");

        Self {
            container,
            client,
            connection_string,
        }
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// A database no other test has used
    pub fn database(&self) -> Database {
        self.client
            .database(&format!("test_{}", Uuid::new_v4().simple()))
    }

    /// Get the connection string for manual client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_mongo_ping_and_isolated_databases() {
        let mongo = TestMongo::new().await;

        mongo
            .client()
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .unwrap();

        let first = mongo.database();
        let second = mongo.database();
        assert_ne!(first.name(), second.name());
    }
}
