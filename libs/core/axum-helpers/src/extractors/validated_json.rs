//! JSON extractor that runs `validator` rules before the handler sees the body.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Rejects with 400 on malformed JSON and 422 (with per-field details) when
/// the body deserializes but fails validation.
///
/// ```ignore
/// async fn create(ValidatedJson(payload): ValidatedJson<ProductPayload>) -> impl IntoResponse {
///     // payload.validate() already passed
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
