//! Failure reporting.
//!
//! The catch-failure layer hands every failure to a [`FailureReporter`]
//! exactly once. The reporter is injected through [`AppState`] rather than
//! reached through a global, so tests can swap in a recording one.
//!
//! [`AppState`]: crate::state::AppState

use std::fmt;

use axum::http::{Method, Uri};

use crate::api_error::ApiError;

/// How the failure left the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The handler returned an error that was rendered as an envelope.
    Returned,
    /// The handler panicked, either when called or while its future was polled.
    Panicked,
    /// Routing or middleware answered with a bodiless error (405, 408).
    Generated,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Returned => f.write_str("returned"),
            Self::Panicked => f.write_str("panicked"),
            Self::Generated => f.write_str("generated"),
        }
    }
}

/// The request a failure belongs to.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub method: Method,
    pub uri: Uri,
}

/// Observability sink for the centralized error path.
pub trait FailureReporter: Send + Sync + 'static {
    fn report(&self, request: &RequestMeta, kind: FailureKind, error: &ApiError);
}

/// Default reporter: client errors at `warn`, server errors at `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, request: &RequestMeta, kind: FailureKind, error: &ApiError) {
        if error.http_status().is_server_error() {
            tracing::error!(
                method = %request.method,
                uri = %request.uri,
                status = error.status_code(),
                %kind,
                reason = %error.message(),
                stack = %error.stack(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                method = %request.method,
                uri = %request.uri,
                status = error.status_code(),
                %kind,
                reason = %error.message(),
                errors = error.errors().len(),
                "Request rejected"
            );
        }
    }
}
