//! Presence snapshot handler.

use axum::Json;
use axum::extract::{Query, State};


use crate::dto::request::PresenceQuery;
use crate::dto::response::{ApiResponse, PresenceResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/presence?zone_id=
pub async fn snapshot(
    State(state): State<AppState>,
    Query(query): Query<PresenceQuery>,
) -> ApiResult<Json<ApiResponse<PresenceResponse>>> {
    let users = state.engine.gateway.presence_snapshot(query.zone_id.as_ref())?;
    Ok(Json(ApiResponse::ok(PresenceResponse {
        zone_id: query.zone_id,
        users,
    })))
}
