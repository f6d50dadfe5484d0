pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1005,
///   "error": "NOT_FOUND",
///   "message": "Product 0190f7a4-... not found",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable identifier, see [`ErrorCode`]
    pub error: String,
    pub message: String,
    /// Field-level details, present for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Errors that handlers return; each variant maps to one status and [`ErrorCode`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Request cancelled: {0}")]
    Cancelled(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::JsonExtractorRejection(e) => e.status(),
            Self::ValidationError(_) | Self::UnprocessableEntity(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::InvalidQuery(_) | Self::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Cancelled(_) | Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Persistence(_) | Self::InternalServerError(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::JsonExtractorRejection(JsonRejection::JsonDataError(_)) => {
                ErrorCode::UnprocessableEntity
            }
            Self::JsonExtractorRejection(_) => ErrorCode::InvalidJson,
            Self::ValidationError(_) => ErrorCode::ValidationError,
            Self::InvalidQuery(_) => ErrorCode::InvalidQuery,
            Self::InvalidIdentifier(_) => ErrorCode::InvalidIdentifier,
            Self::UnprocessableEntity(_) => ErrorCode::UnprocessableEntity,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Persistence(_) => ErrorCode::PersistenceError,
            Self::Cancelled(_) => ErrorCode::RequestCancelled,
            Self::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
            Self::InternalServerError(_) => ErrorCode::InternalError,
            Self::Io(_) => ErrorCode::IoError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(error_code = code.code(), error = %self, "Request failed");
        } else {
            tracing::info!(error_code = code.code(), error = %self, "Request rejected");
        }

        // Server-side failures keep their internals in the logs only.
        let (message, details) = match self {
            AppError::JsonExtractorRejection(e) => (e.body_text(), None),
            AppError::ValidationError(e) => (
                code.default_message().to_string(),
                Some(validation_details(&e)),
            ),
            AppError::Persistence(_) | AppError::InternalServerError(_) | AppError::Io(_) => {
                (code.default_message().to_string(), None)
            }
            AppError::InvalidQuery(msg)
            | AppError::InvalidIdentifier(msg)
            | AppError::UnprocessableEntity(msg)
            | AppError::NotFound(msg)
            | AppError::Cancelled(msg)
            | AppError::ServiceUnavailable(msg) => (msg, None),
        };

        error_response(status, code, message, details)
    }
}

/// Builds a response carrying an [`ErrorResponse`] body.
pub fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    details: Option<Value>,
) -> Response {
    let body = ErrorResponse {
        code: code.code(),
        error: code.as_str().to_string(),
        message: message.into(),
        details,
    };
    (status, Json(body)).into_response()
}

/// `{ field: [{ code, message, params }] }` for each failing field.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<Value> = errors
                .iter()
                .map(|err| {
                    json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1))]
        name: String,
    }

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let response = AppError::NotFound("Product 42 not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(body.code, 1005);
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.message, "Product 42 not found");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_persistence_hides_driver_message() {
        let response =
            AppError::Persistence("connection reset by 10.0.0.7".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.error, "PERSISTENCE_ERROR");
        assert!(!body.message.contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn test_validation_errors_are_unprocessable_with_details() {
        let errors = Sample {
            name: String::new(),
        }
        .validate()
        .unwrap_err();
        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_of(response).await;
        assert_eq!(body.error, "VALIDATION_ERROR");
        let details = body.details.unwrap();
        assert_eq!(details["name"][0]["code"], "length");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::InvalidQuery("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidIdentifier("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Cancelled("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::UnprocessableEntity("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
