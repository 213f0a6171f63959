//! Async boundary adapter.
//!
//! [`CatchFailureLayer`] wraps any request service (a whole router, one
//! route, or a single handler via `Handler::layer`) and guarantees that no
//! failure escapes it:
//!
//! - a handler that returns `Err(AppError)` has already been rendered as an
//!   [`ApiError`] envelope; the layer reports it and passes the response on;
//! - a handler that panics, either synchronously inside `Service::call` or
//!   while its future is being polled, is converted into a `500` envelope and
//!   reported;
//! - successful responses pass through untouched and are never reported.
//!
//! Each failure is reported exactly once. The [`ReportableFailure`] marker is
//! removed from the response when it is reported, so stacking the layer
//! (router-wide plus per-route) does not report twice.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use futures::future::{BoxFuture, FutureExt};
use tower::{Layer, Service};

use crate::api_error::{ApiError, ReportableFailure, DEFAULT_ERROR_MESSAGE};
use crate::error::AppError;
use crate::report::{FailureKind, FailureReporter, RequestMeta};

/// Layer producing [`CatchFailure`] services.
#[derive(Clone)]
pub struct CatchFailureLayer {
    reporter: Arc<dyn FailureReporter>,
}

impl CatchFailureLayer {
    pub fn new(reporter: Arc<dyn FailureReporter>) -> Self {
        Self { reporter }
    }
}

impl<S> Layer<S> for CatchFailureLayer {
    type Service = CatchFailure<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CatchFailure {
            inner,
            reporter: Arc::clone(&self.reporter),
        }
    }
}

/// Wrap a single service without going through a router.
pub fn catch_failures<S>(service: S, reporter: Arc<dyn FailureReporter>) -> CatchFailure<S> {
    CatchFailureLayer::new(reporter).layer(service)
}

/// Service funneling every handler failure into the centralized error path.
#[derive(Clone)]
pub struct CatchFailure<S> {
    inner: S,
    reporter: Arc<dyn FailureReporter>,
}

impl<S> Service<Request> for CatchFailure<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let meta = RequestMeta {
            method: req.method().clone(),
            uri: req.uri().clone(),
        };
        let reporter = Arc::clone(&self.reporter);

        // The instance polled ready is the one that must handle the call.
        let fresh = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, fresh);

        let future = match std::panic::catch_unwind(AssertUnwindSafe(|| inner.call(req))) {
            Ok(future) => future,
            Err(payload) => {
                let response = recover(&*reporter, &meta, payload);
                return Box::pin(async move { Ok(response) });
            }
        };

        Box::pin(async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(Ok(response)) => Ok(forward(&*reporter, &meta, response)),
                Ok(Err(err)) => Err(err),
                Err(payload) => Ok(recover(&*reporter, &meta, payload)),
            }
        })
    }
}

/// Report a failure the handler returned, if the response carries one.
fn forward(reporter: &dyn FailureReporter, meta: &RequestMeta, mut response: Response) -> Response {
    if let Some(ReportableFailure(error)) = response.extensions_mut().remove::<ReportableFailure>()
    {
        reporter.report(meta, FailureKind::Returned, &error);
    }
    response
}

/// Turn a panic into a reported `500` envelope.
fn recover(
    reporter: &dyn FailureReporter,
    meta: &RequestMeta,
    payload: Box<dyn Any + Send>,
) -> Response {
    let error = error_from_panic(payload);
    reporter.report(meta, FailureKind::Panicked, &error);

    let mut response = error.into_response();
    response.extensions_mut().remove::<ReportableFailure>();
    response
}

/// Coerce a panic payload into an envelope.
///
/// Envelopes raised with `std::panic::panic_any` keep their status, message
/// and details. String payloads become the message of a `500`; any other
/// payload gets the generic message.
pub fn error_from_panic(payload: Box<dyn Any + Send>) -> ApiError {
    let payload = match payload.downcast::<ApiError>() {
        Ok(error) => return *error,
        Err(other) => other,
    };
    let payload = match payload.downcast::<AppError>() {
        Ok(error) => return ApiError::from(*error),
        Err(other) => other,
    };

    let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        DEFAULT_ERROR_MESSAGE.to_string()
    };

    ApiError::internal(message)
}
