//! Room history and roster handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use campus_core::types::RoomId;

use crate::dto::request::HistoryQuery;
use crate::dto::response::{ApiResponse, MessagesResponse, RosterResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/rooms/{room_id}/messages?limit=
pub async fn messages(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<ApiResponse<MessagesResponse>>> {
    let messages = state
        .engine
        .gateway
        .get_messages(&room_id, query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(MessagesResponse { room_id, messages })))
}

/// GET /api/rooms/{room_id}/roster
pub async fn roster(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> ApiResult<Json<ApiResponse<RosterResponse>>> {
    let roster = state.engine.gateway.get_roster(&room_id).await?;
    let occupancy = state.engine.rooms.occupancy(&room_id).await?;
    Ok(Json(ApiResponse::ok(RosterResponse {
        room_id,
        occupancy,
        roster,
    })))
}
