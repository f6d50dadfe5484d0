use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

const DEVELOPMENT_FILTER: &str = "debug,tower_http=debug,mongodb=info,hyper=info";
const PRODUCTION_FILTER: &str = "info,tower_http=info,mongodb=warn";

/// Install color-eyre with the project-standard hook.
///
/// Call early in main() before any fallible operation. Safe to call twice.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with environment-aware formatting and span trace capture.
///
/// - **Production** (`APP_ENV=production`): flattened JSON lines without targets.
/// - **Development**: pretty, human-readable output.
///
/// `RUST_LOG` overrides the default filter in both modes. A second call is a
/// no-op, which keeps tests that initialize tracing independent of each other.
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new(PRODUCTION_FILTER)
        } else {
            EnvFilter::new(DEVELOPMENT_FILTER)
        }
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Production);
        init_tracing(&Environment::Development);
    }

    #[test]
    fn test_init_tracing_respects_rust_log() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            init_tracing(&Environment::Production);
        });
    }
}
