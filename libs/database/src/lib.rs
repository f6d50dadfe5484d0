//! Database connectivity shared by the service crates.
//!
//! # Features
//!
//! - `mongodb` (default): MongoDB client construction, retrying connect and health probes
//! - `config`: `FromEnv` support for [`mongodb::MongoConfig`] via `core_config`
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::common::RetryPolicy;
//! use database::mongodb::{MongoConfig, connect_with_retry};
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_with_retry(&config, RetryPolicy::default()).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult, RetryPolicy, retry_with_backoff};
