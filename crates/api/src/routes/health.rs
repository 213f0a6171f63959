use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Health routes mounted under `/api/v1`.
///
/// ```text
/// GET    /healthcheck       -> health_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(health::health_check))
}
