//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::get as get_route;
use axum::Router;
use common::{body_json, build_test_app, build_test_app_with, get, send, test_config};
use gigmart_api::report::FailureKind;

// ---------------------------------------------------------------------------
// Test: GET /api/v1/healthcheck returns the success envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_success_envelope() {
    let (app, reporter) = build_test_app();
    let response = get(app, "/api/v1/healthcheck").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({
            "statusCode": 200,
            "data": {},
            "message": "Health check passed",
            "success": true,
        })
    );
    assert!(reporter.reports().is_empty());
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns a 404 error envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404_envelope() {
    let (app, reporter) = build_test_app();
    let response = get(app, "/api/v1/gigs/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 404);
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
    assert_eq!(json["message"], "Route GET /api/v1/gigs/does-not-exist not found");
    assert_eq!(json["errors"], serde_json::json!([]));

    let reports = reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status, 404);
}

// ---------------------------------------------------------------------------
// Test: Wrong method returns a 405 error envelope, not an empty body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn wrong_method_returns_405_envelope() {
    let (app, reporter) = build_test_app();

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/healthcheck")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ALLOW));

    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 405);
    assert_eq!(json["message"], "Method Not Allowed");
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());

    let reports = reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, FailureKind::Generated);
    assert_eq!(reports[0].status, 405);
    assert_eq!(reports[0].method, Method::DELETE);
}

// ---------------------------------------------------------------------------
// Test: a timed-out request returns a 408 envelope and is reported
// ---------------------------------------------------------------------------

async fn slow_report() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "done"
}

#[tokio::test]
async fn timed_out_request_returns_reported_408_envelope() {
    let config = gigmart_api::config::ServerConfig {
        request_timeout_secs: 1,
        ..test_config()
    };
    let api = Router::new().route("/reports/slow", get_route(slow_report));
    let (app, reporter) = build_test_app_with(api, config);

    let response = get(app, "/api/v1/reports/slow").await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 408);
    assert_eq!(json["message"], "Request Timeout");
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());

    let reports = reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, FailureKind::Generated);
    assert_eq!(reports[0].status, 408);
    assert_eq!(reports[0].path, "/api/v1/reports/slow");
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let (app, _reporter) = build_test_app();
    let response = get(app, "/api/v1/healthcheck").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

#[tokio::test]
async fn error_responses_also_carry_request_id() {
    let (app, _reporter) = build_test_app();
    let response = get(app, "/nowhere").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let (app, _reporter) = build_test_app();

    // CORS preflight requires custom headers, so we build the request manually.
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/healthcheck")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "http://localhost:5173");
}
