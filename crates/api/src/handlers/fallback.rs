use axum::http::{Method, Uri};

use crate::api_error::ApiError;

/// Router fallback: unknown paths get a `404` envelope instead of an empty body.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {method} {} not found", uri.path()))
}
