use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use strum::{Display, IntoStaticStr};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid product: {0}")]
    Validation(String),

    #[error("Malformed product identifier '{0}'")]
    MalformedIdentifier(String),

    #[error("Product {0} not found")]
    NotFound(Uuid),

    #[error("Persistence failure during {context}: {message}")]
    Persistence { context: String, message: String },

    #[error("{operation} was cancelled before completing")]
    Cancelled { operation: String },
}

/// Coarse classification used for logging and transport mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    InvalidFilter,
    Validation,
    MalformedIdentifier,
    NotFound,
    Persistence,
    Cancelled,
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProductError::InvalidFilter(_) => ErrorKind::InvalidFilter,
            ProductError::Validation(_) => ErrorKind::Validation,
            ProductError::MalformedIdentifier(_) => ErrorKind::MalformedIdentifier,
            ProductError::NotFound(_) => ErrorKind::NotFound,
            ProductError::Persistence { .. } => ErrorKind::Persistence,
            ProductError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    pub fn persistence(context: impl Into<String>, message: impl ToString) -> Self {
        ProductError::Persistence {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn cancelled(operation: impl Into<String>) -> Self {
        ProductError::Cancelled {
            operation: operation.into(),
        }
    }

    /// Tags a persistence failure with the operation and record it concerned.
    /// Other kinds already identify themselves and pass through unchanged.
    pub fn within(self, operation: &str, id: Option<Uuid>) -> Self {
        match self {
            ProductError::Persistence { message, .. } => ProductError::Persistence {
                context: match id {
                    Some(id) => format!("{operation} of product {id}"),
                    None => operation.to_string(),
                },
                message,
            },
            other => other,
        }
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::InvalidFilter => AppError::InvalidQuery(message),
            ErrorKind::Validation => AppError::UnprocessableEntity(message),
            ErrorKind::MalformedIdentifier => AppError::InvalidIdentifier(message),
            ErrorKind::NotFound => AppError::NotFound(message),
            ErrorKind::Persistence => AppError::Persistence(message),
            ErrorKind::Cancelled => AppError::Cancelled(message),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<ValidationErrors> for ProductError {
    fn from(errors: ValidationErrors) -> Self {
        ProductError::Validation(errors.to_string())
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::persistence("mongodb", err)
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::persistence("bson encoding", err)
    }
}
