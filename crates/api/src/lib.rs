//! gigmart API server library.
//!
//! Exposes the response envelopes, the error normalization path, the
//! catch-failure middleware, configuration and routes so integration tests
//! and the binary entrypoint can both access them.

pub mod api_error;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod report;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
