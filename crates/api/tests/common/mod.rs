#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gigmart_api::api_error::ApiError;
use gigmart_api::config::{LogFormat, ServerConfig};
use gigmart_api::report::{FailureKind, FailureReporter, RequestMeta};
use gigmart_api::router::{build_app_router, build_router_with};
use gigmart_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        log_format: LogFormat::Pretty,
    }
}

/// One call to [`RecordingReporter::report`].
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: FailureKind,
    pub method: Method,
    pub path: String,
    pub status: u16,
    pub message: String,
    pub errors: Vec<Value>,
    pub stack: String,
}

/// Reporter that remembers every failure it is handed.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<Report>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, request: &RequestMeta, kind: FailureKind, error: &ApiError) {
        self.reports.lock().unwrap().push(Report {
            kind,
            method: request.method.clone(),
            path: request.uri.path().to_string(),
            status: error.status_code(),
            message: error.message().to_string(),
            errors: error.errors().to_vec(),
            stack: error.stack().to_string(),
        });
    }
}

/// Build the full application router with a recording reporter.
///
/// Uses the same `build_app_router` as `main.rs` so integration tests
/// exercise the production middleware stack.
pub fn build_test_app() -> (Router, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let state = AppState::with_reporter(test_config(), reporter.clone());
    let app = build_app_router(state).expect("test config is valid");
    (app, reporter)
}

/// Like [`build_test_app`], with custom `/api/v1` routes and config.
pub fn build_test_app_with(
    api: Router<AppState>,
    config: ServerConfig,
) -> (Router, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let state = AppState::with_reporter(config, reporter.clone());
    let app = build_router_with(api, state).expect("test config is valid");
    (app, reporter)
}

/// Send a request through a router.
pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with no body.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a request with a raw JSON body.
pub async fn post_json(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
