pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /healthcheck                                     liveness probe
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::router())
}
