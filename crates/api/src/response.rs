//! Success response envelope.
//!
//! Every successful API response is wrapped as
//! `{ "statusCode", "data", "message", "success" }`. Use [`ApiResponse`]
//! instead of ad-hoc `serde_json::json!` bodies so the shape, and the
//! `success` flag in particular, cannot drift between handlers.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::api_error::ApiError;

/// Message used when a handler does not supply one.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

/// Standard success envelope.
///
/// `success` is derived from the status code at construction and has no
/// setter, so it can never disagree with `statusCode`.
///
/// # Example
///
/// ```ignore
/// Ok(ApiResponse::new(201, gig, "Gig created"))
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    status_code: u16,
    data: T,
    message: String,
    success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: status_code < 400,
        }
    }

    /// `200` with the default message.
    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK.as_u16(), data, DEFAULT_SUCCESS_MESSAGE)
    }

    /// `201` with the default message.
    pub fn created(data: T) -> Self {
        Self::new(StatusCode::CREATED.as_u16(), data, DEFAULT_SUCCESS_MESSAGE)
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn success(&self) -> bool {
        self.success
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let Ok(status) = StatusCode::from_u16(self.status_code) else {
            return ApiError::internal(format!(
                "Invalid HTTP status code {} in response envelope",
                self.status_code
            ))
            .into_response();
        };

        match serde_json::to_vec(&self) {
            Ok(body) => (
                status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                body,
            )
                .into_response(),
            Err(err) => ApiError::internal(format!("Failed to serialize response: {err}"))
                .into_response(),
        }
    }
}
