//! Configuration for Products API

use core_config::{app_info, env_or_default, env_parse_or, server::ServerConfig, AppInfo, ConfigError, FromEnv};
use database::mongodb::MongoConfig;
use domain_products::{mongodb::DEFAULT_COLLECTION, query::DEFAULT_SEARCH_RADIUS_METERS};
use std::time::Duration;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub products: ProductsConfig,
}

/// Catalog settings
///
/// - `PRODUCTS_COLLECTION` (default `products`)
/// - `PRODUCTS_SEARCH_RADIUS_METERS` (default 10000, positive)
/// - `PRODUCTS_REQUEST_TIMEOUT_SECS` (default 30, at least 1)
#[derive(Clone, Debug, PartialEq)]
pub struct ProductsConfig {
    pub collection: String,
    pub search_radius_meters: f64,
    pub request_timeout: Duration,
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            search_radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl FromEnv for ProductsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let search_radius_meters =
            env_parse_or("PRODUCTS_SEARCH_RADIUS_METERS", DEFAULT_SEARCH_RADIUS_METERS)?;
        if !search_radius_meters.is_finite() || search_radius_meters <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "PRODUCTS_SEARCH_RADIUS_METERS".to_string(),
                details: format!("must be a positive number of meters, got {search_radius_meters}"),
            });
        }

        let request_timeout_secs: u64 = env_parse_or("PRODUCTS_REQUEST_TIMEOUT_SECS", 30)?;
        if request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "PRODUCTS_REQUEST_TIMEOUT_SECS".to_string(),
                details: "must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            collection: env_or_default("PRODUCTS_COLLECTION", DEFAULT_COLLECTION),
            search_radius_meters,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mongodb = MongoConfig::from_env()?.with_app_name(env!("CARGO_PKG_NAME"));

        Ok(Self {
            app: app_info!(),
            mongodb,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            products: ProductsConfig::from_env()?,
        })
    }
}
