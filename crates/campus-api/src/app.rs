//! Application builder: wires router, middleware and state into an Axum app,
//! and runs the server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;

use campus_core::config::AppConfig;
use campus_core::config::CorsConfig;
use campus_core::error::AppError;
use campus_realtime::catalog::source::StaticZoneSource;
use campus_realtime::{RealtimeEngine, ZoneCatalog};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Runs the campus presence server until Ctrl-C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting campus presence server...");

    // ── Step 1: Load the zone catalog ────────────────────────────
    let source = StaticZoneSource::from_config(&config);
    let catalog = ZoneCatalog::load(&source).await?;
    tracing::info!(zones = catalog.len(), "Zone catalog loaded");

    // ── Step 2: Start the realtime engine and its sweeper ────────
    let engine = Arc::new(RealtimeEngine::new(config.realtime.clone(), catalog));
    let sweeper = engine.spawn_sweeper();

    // ── Step 3: Build and start HTTP server ──────────────────────
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = build_app(
        AppState::new(config.clone(), engine.clone()),
        &config.server.cors,
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Campus presence server listening on {}", addr);

    let shutdown_engine = engine.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            if let Err(e) = shutdown_engine.shutdown().await {
                tracing::error!(error = %e, "Engine shutdown failed");
            }
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if tokio::time::timeout(grace, sweeper).await.is_err() {
        tracing::warn!("Sweeper did not stop within the shutdown grace period");
    }
    tracing::info!("Campus presence server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
