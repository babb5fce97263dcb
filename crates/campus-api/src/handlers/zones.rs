//! Zone catalog handlers.

use axum::Json;
use axum::extract::State;

use campus_entity::zone::Zone;
use campus_realtime::gateway::ZoneSummary;

use crate::dto::response::ApiResponse;
use crate::state::AppState;

/// GET /api/zones
pub async fn list_zones(State(state): State<AppState>) -> Json<ApiResponse<Vec<Zone>>> {
    Json(ApiResponse::ok(state.engine.gateway.zones().to_vec()))
}

/// GET /api/zones/summary
pub async fn zone_summaries(State(state): State<AppState>) -> Json<ApiResponse<Vec<ZoneSummary>>> {
    Json(ApiResponse::ok(state.engine.gateway.zone_summaries().await))
}
