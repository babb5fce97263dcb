//! Query parameter DTOs.

use serde::{Deserialize, Serialize};

use campus_core::types::ZoneId;

/// `GET /api/presence` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresenceQuery {
    /// Restrict the snapshot to one zone.
    pub zone_id: Option<ZoneId>,
}

/// `GET /api/rooms/{room_id}/messages` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Number of messages; defaults to the configured history limit.
    pub limit: Option<usize>,
}

/// Identity supplied on the WebSocket upgrade. Taken as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityQuery {
    /// Stable user identifier.
    pub user_id: String,
    /// Name shown to others; defaults to the user id.
    #[serde(default)]
    pub display_name: Option<String>,
    /// `student` or `faculty`.
    #[serde(default)]
    pub role: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
}
