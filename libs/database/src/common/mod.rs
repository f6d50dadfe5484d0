//! Helpers that do not depend on a particular driver

pub mod error;
pub mod retry;

pub use error::{DatabaseError, DatabaseResult};
pub use retry::{RetryPolicy, retry_with_backoff};
