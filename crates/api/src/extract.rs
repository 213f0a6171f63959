//! Request extractors that reject with [`AppError`].

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then checked with [`Validate`].
///
/// Malformed bodies reject with the JSON rejection's status (400, 415 or
/// 422); payloads that decode but fail validation reject with `422` and one
/// `errors` entry per failing field.
///
/// ```ignore
/// async fn create_gig(ValidatedJson(input): ValidatedJson<CreateGig>) -> AppResult<ApiResponse<Gig>> {
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// [`axum::extract::Path`] rejecting with an `AppError` envelope
/// ("Invalid path parameters") instead of axum's plain-text body.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParams<T>(pub T);

/// [`axum::extract::Query`] rejecting with an `AppError` envelope
/// ("Invalid query string").
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);
