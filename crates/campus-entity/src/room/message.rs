//! Chat message value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_core::types::{RoomId, UserId};

use crate::user::DisplayAttrs;

/// One message in a room's log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Per-room sequence number, strictly increasing from 1.
    pub id: u64,
    /// Room the message was published to.
    pub room_id: RoomId,
    /// Author.
    pub sender_user_id: UserId,
    /// Author's display attributes at publish time.
    pub sender: DisplayAttrs,
    /// Trimmed body.
    pub body: String,
    /// Authoritative server time.
    pub server_timestamp: DateTime<Utc>,
}
