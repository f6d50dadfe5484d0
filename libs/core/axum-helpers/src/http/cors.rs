use axum::http::{HeaderName, HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use super::REQUEST_ID_HEADER;

/// Splits a comma-separated origin list, ignoring blanks.
pub fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, io::Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid CORS origin '{s}': {e}"),
                )
            })
        })
        .collect()
}

/// CORS restricted to `origins`, allowing the methods the product API serves.
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600))
}

/// Reads `CORS_ALLOWED_ORIGIN`. Unset or blank means any origin is allowed.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    match std::env::var("CORS_ALLOWED_ORIGIN") {
        Ok(raw) if !raw.trim().is_empty() => {
            let origins = parse_origins(&raw)?;
            info!(origins = %raw, "CORS restricted to configured origins");
            Ok(create_cors_layer(origins))
        }
        _ => {
            warn!("CORS_ALLOWED_ORIGIN not set, allowing any origin");
            Ok(CorsLayer::permissive())
        }
    }
}
