//! Envelope for bodiless error responses.
//!
//! Some error responses are produced below the handlers: `405` from method
//! routing, `408` from the timeout layer. They come out with a status and an
//! empty body, and they never pass through the catch-failure layer as a
//! failure. [`envelope_bare_errors`] reports them and rewrites them into the
//! standard error envelope so clients only ever see the two JSON shapes.

use axum::body::HttpBody;
use axum::extract::State;
use axum::http::{header, Method, Uri};
use axum::response::{IntoResponse, Response};

use crate::api_error::{ApiError, ReportableFailure, DEFAULT_ERROR_MESSAGE};
use crate::report::{FailureKind, RequestMeta};
use crate::state::AppState;

/// Use with `axum::middleware::map_response_with_state`.
pub async fn envelope_bare_errors(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    response: Response,
) -> Response {
    let Some(error) = bare_error(&response) else {
        return response;
    };

    state
        .reporter
        .report(&RequestMeta { method, uri }, FailureKind::Generated, &error);

    render_over(error, response)
}

/// The envelope for `response`, if it is an error without a body.
fn bare_error(response: &Response) -> Option<ApiError> {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return None;
    }
    if response.headers().contains_key(header::CONTENT_TYPE)
        || response.body().size_hint().exact() != Some(0)
    {
        return None;
    }

    let message = status.canonical_reason().unwrap_or(DEFAULT_ERROR_MESSAGE);
    Some(ApiError::new(status.as_u16()).with_message(message))
}

fn render_over(error: ApiError, bare: Response) -> Response {
    let (parts, _) = bare.into_parts();

    let mut rendered = error.into_response();
    rendered.extensions_mut().remove::<ReportableFailure>();

    // Keep headers such as `allow` on a 405.
    for (name, value) in &parts.headers {
        if name != header::CONTENT_LENGTH {
            rendered.headers_mut().append(name.clone(), value.clone());
        }
    }
    rendered
}
