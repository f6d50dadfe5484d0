//! Stable error identifiers shared by every error body.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::InvalidQuery.as_str(), "INVALID_QUERY");
//! assert_eq!(ErrorCode::InvalidQuery.code(), 1004);
//! ```

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use utoipa::ToSchema;

/// Machine-readable error identifier.
///
/// Integer ranges: 1000-1999 client errors, 5000-5999 server errors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    InvalidJson,
    InvalidIdentifier,
    InvalidQuery,
    NotFound,
    UnprocessableEntity,

    InternalError,
    PersistenceError,
    ServiceUnavailable,
    RequestCancelled,
    IoError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidJson => 1002,
            Self::InvalidIdentifier => 1003,
            Self::InvalidQuery => 1004,
            Self::NotFound => 1005,
            Self::UnprocessableEntity => 1007,

            Self::InternalError => 5001,
            Self::PersistenceError => 5002,
            Self::ServiceUnavailable => 5003,
            Self::RequestCancelled => 5004,
            Self::IoError => 5005,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidJson => "Invalid JSON format",
            Self::InvalidIdentifier => "Invalid identifier format",
            Self::InvalidQuery => "Invalid query parameters",
            Self::NotFound => "Resource not found",
            Self::UnprocessableEntity => "Request cannot be processed",
            Self::InternalError => "An internal server error occurred",
            Self::PersistenceError => "The storage backend failed to complete the request",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::RequestCancelled => "The request was cancelled before it completed",
            Self::IoError => "I/O error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_serde_forms_agree() {
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::InvalidIdentifier,
            ErrorCode::PersistenceError,
            ErrorCode::RequestCancelled,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(serde_json::from_str::<ErrorCode>(&json).unwrap(), code);
        }
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::NotFound.code(), 1005);
        assert_eq!(ErrorCode::PersistenceError.code(), 5002);
    }

    #[test]
    fn test_display_uses_identifier() {
        assert_eq!(ErrorCode::InvalidQuery.to_string(), "INVALID_QUERY");
        assert_eq!(ErrorCode::NotFound.default_message(), "Resource not found");
    }
}
