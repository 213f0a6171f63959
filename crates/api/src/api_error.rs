//! Error response envelope.
//!
//! [`ApiError`] is the single currency of failure at the HTTP boundary.
//! Whatever goes wrong inside a handler ends up as one of these before a
//! response is written, rendered as
//! `{ "statusCode", "data": null, "message", "success": false, "errors" }`.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::Location;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Message used when no message, or an empty one, is supplied.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Standard error envelope.
///
/// `data` is always `null` and `success` is always `false`, whatever the
/// status code. Clients rely on the literal `false`, so it is not derived
/// from the status the way [`ApiResponse`](crate::response::ApiResponse)
/// derives its flag.
///
/// The `stack` never leaves the process; it is logged by the failure
/// reporter and omitted from the serialized body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    status_code: u16,
    message: String,
    errors: Vec<Value>,
    stack: String,
}

impl ApiError {
    /// Build an error with the default message and no sub-errors.
    ///
    /// The origin recorded in `stack` is the caller of this constructor.
    #[track_caller]
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            message: DEFAULT_ERROR_MESSAGE.to_string(),
            errors: Vec::new(),
            stack: capture_stack(Location::caller()),
        }
    }

    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST.as_u16()).with_message(message)
    }

    /// `400` carrying per-field or free-form details in `errors`.
    #[track_caller]
    pub fn validation<I, E>(message: impl Into<String>, errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Serialize,
    {
        Self::bad_request(message).with_errors(errors)
    }

    #[track_caller]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED.as_u16()).with_message(message)
    }

    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN.as_u16()).with_message(message)
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND.as_u16()).with_message(message)
    }

    #[track_caller]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT.as_u16()).with_message(message)
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR.as_u16()).with_message(message)
    }

    /// Replace the message, stored as given.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Replace the sub-error list, keeping the given order.
    pub fn with_errors<I, E>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Serialize,
    {
        self.errors = errors.into_iter().map(|e| to_detail(&e)).collect();
        self
    }

    /// Append one sub-error.
    pub fn with_error(mut self, error: impl Serialize) -> Self {
        self.errors.push(to_detail(&error));
        self
    }

    /// Use a trace captured elsewhere verbatim. An empty string keeps the
    /// locally captured one.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        let stack = stack.into();
        if !stack.is_empty() {
            self.stack = stack;
        }
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &[Value] {
        &self.errors
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Always `false`.
    pub fn success(&self) -> bool {
        false
    }

    /// HTTP status to write. Codes outside the valid range become `500`.
    pub fn http_status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Serialize for ApiError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ApiError", 5)?;
        s.serialize_field("statusCode", &self.status_code)?;
        s.serialize_field("data", &Option::<()>::None)?;
        s.serialize_field("message", &self.message)?;
        s.serialize_field("success", &false)?;
        s.serialize_field("errors", &self.errors)?;
        s.end()
    }
}

/// A failure that has been rendered into a response but not yet reported.
///
/// [`ApiError::into_response`] attaches it to the response extensions;
/// the catch-failure layer takes it back out and hands it to the
/// [`FailureReporter`](crate::report::FailureReporter).
#[derive(Debug, Clone)]
pub struct ReportableFailure(pub ApiError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.http_status(), Json(&self)).into_response();
        response.extensions_mut().insert(ReportableFailure(self));
        response
    }
}

fn to_detail<E: Serialize + ?Sized>(error: &E) -> Value {
    serde_json::to_value(error).unwrap_or_else(|err| Value::String(err.to_string()))
}

// ---------------------------------------------------------------------------
// Stack capture
// ---------------------------------------------------------------------------

/// Record `origin` and, when backtraces are enabled, the runtime backtrace
/// with the capture machinery stripped from the top.
pub(crate) fn capture_stack(origin: &Location<'_>) -> String {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => {
            format!("at {origin}\n{}", trim_capture_frames(&backtrace.to_string()))
        }
        _ => format!("at {origin}"),
    }
}

/// Drop the leading frames belonging to `std::backtrace`, to the error
/// constructors and to the `?` conversion that called them.
fn trim_capture_frames(rendered: &str) -> String {
    let mut frames: Vec<String> = Vec::new();
    for line in rendered.lines() {
        if frames.is_empty() || is_frame_header(line) {
            frames.push(String::new());
        }
        if let Some(frame) = frames.last_mut() {
            frame.push_str(line);
            frame.push('\n');
        }
    }

    let first_kept = frames
        .iter()
        .position(|frame| !is_capture_frame(frame))
        .unwrap_or(frames.len());

    frames[first_kept..].concat().trim_end().to_string()
}

fn is_frame_header(line: &str) -> bool {
    line.trim_start()
        .split_once(':')
        .is_some_and(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

const CAPTURE_FRAMES: &[&str] = &[
    "std::backtrace",
    "api_error::capture_stack",
    "api_error::ApiError::",
    "error::AppError",
    "from_residual",
    "core::convert::",
];

fn is_capture_frame(frame: &str) -> bool {
    let header = frame.lines().next().unwrap_or_default();
    CAPTURE_FRAMES.iter().any(|marker| header.contains(marker))
}
