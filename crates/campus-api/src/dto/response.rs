//! Response DTOs.

use serde::{Deserialize, Serialize};

use campus_core::types::{RoomId, ZoneId};
use campus_entity::presence::PresenceRecord;
use campus_entity::room::{ChatMessage, RosterEntry};
use campus_realtime::server::EngineStats;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Uptime.
    pub uptime_seconds: u64,
    /// Engine gauges and counters.
    pub engine: EngineStats,
}

/// Presence snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct PresenceResponse {
    /// Filter that was applied.
    pub zone_id: Option<ZoneId>,
    /// Live records ordered by user id.
    pub users: Vec<PresenceRecord>,
}

/// Room history.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesResponse {
    /// Room that was read.
    pub room_id: RoomId,
    /// Messages, oldest first.
    pub messages: Vec<ChatMessage>,
}

/// Room roster.
#[derive(Debug, Clone, Serialize)]
pub struct RosterResponse {
    /// Room that was read.
    pub room_id: RoomId,
    /// Cached occupancy.
    pub occupancy: u32,
    /// Members in join order.
    pub roster: Vec<RosterEntry>,
}
