use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_first_of, env_parse_or};

/// Connection settings for a MongoDB deployment.
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// `mongodb://[user:pass@]host[:port][/db][?options]`
    pub url: String,
    pub database: String,
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout: Duration,
    pub server_selection_timeout: Duration,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_pool_size(mut self, min: u32, max: u32) -> Self {
        self.min_pool_size = min;
        self.max_pool_size = max;
        self
    }

    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "products".to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(30),
        }
    }
}

/// Environment variables:
/// - `MONGODB_URL` or `MONGO_URL` (required)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (required)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (default 100), `MONGODB_MIN_POOL_SIZE` (default 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_first_of(&["MONGODB_URL", "MONGO_URL"])
            .ok_or_else(|| ConfigError::MissingEnvVar("MONGODB_URL or MONGO_URL".to_string()))?;
        let database = env_first_of(&["MONGODB_DATABASE", "MONGO_DATABASE"]).ok_or_else(|| {
            ConfigError::MissingEnvVar("MONGODB_DATABASE or MONGO_DATABASE".to_string())
        })?;

        let max_pool_size = env_parse_or("MONGODB_MAX_POOL_SIZE", 100)?;
        let min_pool_size = env_parse_or("MONGODB_MIN_POOL_SIZE", 5)?;
        if min_pool_size > max_pool_size {
            return Err(ConfigError::InvalidValue {
                key: "MONGODB_MIN_POOL_SIZE".to_string(),
                details: format!("{min_pool_size} exceeds max pool size {max_pool_size}"),
            });
        }

        Ok(Self {
            url,
            database,
            app_name: env_first_of(&["MONGODB_APP_NAME"]),
            max_pool_size,
            min_pool_size,
            connect_timeout: Duration::from_secs(env_parse_or("MONGODB_CONNECT_TIMEOUT_SECS", 10)?),
            server_selection_timeout: Duration::from_secs(env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                30,
            )?),
        })
    }
}
