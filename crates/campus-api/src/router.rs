//! Route definitions for the campus presence HTTP API.
//!
//! Read endpoints are mounted under `/api`; the WebSocket upgrade lives at
//! `/ws`. The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::Router;
use axum::routing::get;

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(zone_routes())
        .merge(presence_routes())
        .merge(room_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .with_state(state)
}

/// Liveness and engine stats
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Zone catalog and live counts
fn zone_routes() -> Router<AppState> {
    Router::new()
        .route("/zones", get(handlers::zones::list_zones))
        .route("/zones/summary", get(handlers::zones::zone_summaries))
}

/// Presence snapshot
fn presence_routes() -> Router<AppState> {
    Router::new().route("/presence", get(handlers::presence::snapshot))
}

/// Room history and roster
fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms/{room_id}/messages", get(handlers::rooms::messages))
        .route("/rooms/{room_id}/roster", get(handlers::rooms::roster))
}
