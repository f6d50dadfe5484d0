use mongodb::{Client, bson::doc, options::ClientOptions};
use tracing::{info, instrument};

use super::MongoConfig;
use crate::common::{DatabaseError, RetryPolicy, retry_with_backoff};

/// Connection string with any `user:password@` section masked, for logs.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => url.to_string(),
    }
}

/// Builds a client from `config` and verifies it with a `ping`.
#[instrument(skip(config), fields(url = %redact_url(config.url()), database = %config.database()))]
pub async fn connect(config: &MongoConfig) -> Result<Client, DatabaseError> {
    let mut options = ClientOptions::parse(config.url()).await?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.server_selection_timeout);
    options.app_name = config.app_name.clone();

    let client = Client::with_options(options)?;
    client
        .database(config.database())
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed {
            target: redact_url(config.url()),
            reason: e.to_string(),
        })?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect`] retried according to `policy`.
pub async fn connect_with_retry(
    config: &MongoConfig,
    policy: RetryPolicy,
) -> Result<Client, DatabaseError> {
    retry_with_backoff(&policy, || connect(config)).await
}
