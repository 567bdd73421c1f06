use axum::{Json, extract::FromRequest, extract::Request};
use validator::Validate;

use crate::errors::AppError;

/// JSON extractor that runs `validator` rules after deserialization.
///
/// Rejections (malformed JSON or failed validation) are converted to
/// structured [`AppError`] responses instead of axum's plain-text ones.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
