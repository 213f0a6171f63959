use std::sync::Arc;

use crate::config::ServerConfig;
use crate::report::{FailureReporter, TracingReporter};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Sink for the centralized error path.
    pub reporter: Arc<dyn FailureReporter>,
}

impl AppState {
    /// State with the default tracing-backed reporter.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_reporter(config, Arc::new(TracingReporter))
    }

    pub fn with_reporter(config: ServerConfig, reporter: Arc<dyn FailureReporter>) -> Self {
        Self {
            config: Arc::new(config),
            reporter,
        }
    }
}
