//! MongoDB client construction and health probes

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{connect, connect_with_retry, redact_url};
pub use health::{HealthStatus, check_health, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
