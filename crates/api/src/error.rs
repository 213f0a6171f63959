use std::panic::Location;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gigmart_core::error::CoreError;
use gigmart_core::validation::field_errors;

use crate::api_error::{capture_stack, ApiError, DEFAULT_ERROR_MESSAGE};

/// Application-level error type for HTTP handlers.
///
/// Pairs an [`ErrorKind`] with the stack of the place it was raised. The
/// stack is captured when the error is created (`?`, `.into()` or one of the
/// constructors), not when the response is rendered, so the reported origin
/// is the failing handler.
///
/// Every kind is normalized into an [`ApiError`] envelope on its way out;
/// handlers never build error responses by hand.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct AppError {
    kind: ErrorKind,
    stack: String,
}

/// What went wrong.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A domain-level error from `gigmart_core`.
    #[error(transparent)]
    Core(CoreError),

    /// An envelope built directly by the handler. It carries its own stack.
    #[error(transparent)]
    Api(ApiError),

    /// The request body was not valid JSON for the expected type.
    #[error(transparent)]
    Json(JsonRejection),

    #[error(transparent)]
    Query(QueryRejection),

    #[error(transparent)]
    Path(PathRejection),

    /// `validator::Validate` rejected the decoded payload.
    #[error("Validation failed")]
    Validation(#[source] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("{0}")]
    BadRequest(String),

    /// Anything else. Rendered as `500` with the error's own message.
    #[error(transparent)]
    Internal(anyhow::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        let stack = match kind {
            ErrorKind::Api(_) => String::new(),
            _ => capture_stack(Location::caller()),
        };
        Self { kind, stack }
    }

    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest(message.into()))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Where the error was raised. Empty for [`ErrorKind::Api`], whose
    /// envelope holds its own.
    pub fn stack(&self) -> &str {
        &self.stack
    }
}

impl From<ErrorKind> for AppError {
    #[track_caller]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// `From` impls for every failure source. `#[track_caller]` makes `?` record
/// the line of the `?` itself.
macro_rules! raise_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for AppError {
                #[track_caller]
                fn from(err: $source) -> Self {
                    Self::new(ErrorKind::$variant(err))
                }
            }
        )*
    };
}

raise_from! {
    CoreError => Core,
    ApiError => Api,
    JsonRejection => Json,
    QueryRejection => Query,
    PathRejection => Path,
    validator::ValidationErrors => Validation,
    anyhow::Error => Internal,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let AppError { kind, stack } = err;

        let envelope = match kind {
            ErrorKind::Api(api) => return api,

            ErrorKind::Core(core) => match core {
                CoreError::NotFound { .. } => ApiError::not_found(core.to_string()),
                CoreError::Validation { message, errors } => {
                    if errors.is_empty() {
                        ApiError::validation(message.clone(), [message])
                    } else {
                        ApiError::validation(message, errors)
                    }
                }
                CoreError::Conflict(msg) => ApiError::conflict(msg),
                CoreError::Unauthorized(msg) => ApiError::unauthorized(msg),
                CoreError::Forbidden(msg) => ApiError::forbidden(msg),
                CoreError::Internal(msg) => internal_with_message(msg),
            },

            ErrorKind::Json(rejection) => ApiError::new(rejection.status().as_u16())
                .with_message("Invalid request body")
                .with_error(rejection.body_text()),
            ErrorKind::Query(rejection) => ApiError::new(rejection.status().as_u16())
                .with_message("Invalid query string")
                .with_error(rejection.body_text()),
            ErrorKind::Path(rejection) => ApiError::new(rejection.status().as_u16())
                .with_message("Invalid path parameters")
                .with_error(rejection.body_text()),

            ErrorKind::Validation(errors) => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY.as_u16())
                    .with_message("Validation failed")
                    .with_errors(field_errors(&errors))
            }

            ErrorKind::BadRequest(msg) => ApiError::validation(msg.clone(), [msg]),

            ErrorKind::Internal(err) => internal_with_message(format!("{err:#}")),
        };

        envelope.with_stack(stack)
    }
}

fn internal_with_message(message: String) -> ApiError {
    if message.trim().is_empty() {
        ApiError::internal(DEFAULT_ERROR_MESSAGE)
    } else {
        ApiError::internal(message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
