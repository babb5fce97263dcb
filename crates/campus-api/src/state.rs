//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use campus_core::config::AppConfig;
use campus_realtime::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Presence, rooms and the synchronization gateway
    pub engine: Arc<RealtimeEngine>,
    /// When the process started serving
    pub started_at: Instant,
}

impl AppState {
    /// Wraps an engine and its configuration.
    pub fn new(config: AppConfig, engine: Arc<RealtimeEngine>) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            started_at: Instant::now(),
        }
    }
}
