//! HTTP middleware: CORS, request ids and security headers.

pub mod cors;
pub mod request_id;
pub mod security;

pub use cors::{cors_layer_from_env, create_cors_layer, parse_origins};
pub use request_id::{MakeRequestUuidV7, REQUEST_ID_HEADER};
pub use security::security_headers;
