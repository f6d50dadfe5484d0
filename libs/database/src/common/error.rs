/// Errors raised while connecting to or probing a database
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection to {target} failed: {reason}")]
    ConnectionFailed { target: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
