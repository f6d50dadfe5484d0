use crate::{env_or_default, env_parse_or, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Grace period for in-flight requests after a shutdown signal
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    /// - SHUTDOWN_TIMEOUT_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse_or("PORT", 8080_u16)?;
        let shutdown_secs = env_parse_or("SHUTDOWN_TIMEOUT_SECS", 30_u64)?;

        Ok(Self {
            host,
            port,
            shutdown_timeout: Duration::from_secs(shutdown_secs),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}
