//! Inbound commands, outbound frames and internal event types.

use serde::{Deserialize, Serialize};

use campus_core::types::{ConnectionId, RoomId, SessionId, UserId, ZoneId};
use campus_entity::presence::{Position, PresenceRecord, PresenceStatus};
use campus_entity::room::{ChatMessage, RosterEntry};
use campus_entity::user::DisplayAttrs;
use campus_entity::zone::Zone;

/// Event pushed to every session of one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomEvent {
    /// The roster changed; carries the full roster in join order.
    MembershipChanged {
        /// Room whose roster changed.
        room_id: RoomId,
        /// Occupancy after the change.
        occupancy: u32,
        /// Current members.
        roster: Vec<RosterEntry>,
    },
    /// A message was appended to the room log.
    Message {
        /// Room the message belongs to.
        room_id: RoomId,
        /// The message.
        message: ChatMessage,
    },
}

/// Global presence diff, broadcast to every connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceChanged {
    /// Whose presence changed.
    pub user_id: UserId,
    /// Display attributes, when known.
    pub display: Option<DisplayAttrs>,
    /// Zone after the change.
    pub zone_id: Option<ZoneId>,
    /// Position after the change.
    pub position: Option<Position>,
    /// Status after the change.
    pub status: PresenceStatus,
    /// Status line after the change.
    pub status_message: Option<String>,
    /// `false` once the record was removed or expired.
    pub online: bool,
}

impl PresenceChanged {
    /// Describes an upserted record.
    pub fn online(record: &PresenceRecord) -> Self {
        Self::from_record(record, true)
    }

    /// Describes a removed or expired record.
    pub fn offline(record: &PresenceRecord) -> Self {
        Self::from_record(record, false)
    }

    fn from_record(record: &PresenceRecord, online: bool) -> Self {
        Self {
            user_id: record.user_id.clone(),
            display: record.display.clone(),
            zone_id: record.zone_id.clone(),
            position: record.position,
            status: record.status,
            status_message: record.status_message.clone(),
            online,
        }
    }
}

/// Opaque handle a client uses to address one of its room sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandle {
    /// Session id.
    pub session_id: SessionId,
    /// Joined room.
    pub room_id: RoomId,
    /// Zone owning the room.
    pub zone_id: ZoneId,
}

/// Frames sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundCommand {
    /// Join a zone's main room.
    Join {
        /// Zone to join.
        zone_id: ZoneId,
    },
    /// Join a specific room or sub-room.
    JoinRoom {
        /// Room to join.
        room_id: RoomId,
    },
    /// Leave a joined room.
    Leave {
        /// Session returned by `joined`.
        session_id: SessionId,
    },
    /// Publish a chat message.
    Say {
        /// Session returned by `joined`.
        session_id: SessionId,
        /// Message body.
        text: String,
    },
    /// Move on the map.
    Move {
        /// Defaults to the connected user.
        #[serde(default)]
        user_id: Option<UserId>,
        /// New position.
        position: Position,
    },
    /// Enter a zone on the map without joining its room. `null` leaves the
    /// current zone.
    EnterZone {
        /// Target zone.
        #[serde(default)]
        zone_id: Option<ZoneId>,
    },
    /// Keep presence and all room sessions alive.
    Heartbeat,
    /// Change self-reported status.
    SetStatus {
        /// New status.
        status: PresenceStatus,
        /// Optional status line.
        #[serde(default)]
        message: Option<String>,
    },
    /// Pull a presence snapshot.
    Snapshot {
        /// Restrict to one zone.
        #[serde(default)]
        zone_id: Option<ZoneId>,
    },
    /// Fetch recent room history.
    GetMessages {
        /// Room to read.
        room_id: RoomId,
        /// Number of messages; defaults to the configured history limit.
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Fetch a room roster.
    GetRoster {
        /// Room to read.
        room_id: RoomId,
    },
}

/// Frames sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// First frame on every connection.
    Welcome {
        /// Server-issued connection id.
        connection_id: ConnectionId,
        /// The connected user.
        user_id: UserId,
        /// Clients should heartbeat well within this window.
        heartbeat_timeout_seconds: u64,
        /// Zone catalog.
        zones: Vec<Zone>,
    },
    /// Reply to `join` / `join_room`.
    Joined {
        /// The new session.
        session: SessionHandle,
    },
    /// Reply to `leave`.
    Left {
        /// The closed session.
        session_id: SessionId,
        /// Room that was left.
        room_id: RoomId,
    },
    /// Room roster changed.
    RoomMembershipChanged {
        /// Room whose roster changed.
        room_id: RoomId,
        /// Occupancy after the change.
        occupancy: u32,
        /// Current members in join order.
        roster: Vec<RosterEntry>,
    },
    /// New chat message.
    RoomMessage {
        /// Room the message belongs to.
        room_id: RoomId,
        /// The message.
        message: ChatMessage,
    },
    /// Someone's presence changed.
    PresenceChanged(PresenceChanged),
    /// Reply to `snapshot`.
    PresenceSnapshot {
        /// Filter that was applied.
        zone_id: Option<ZoneId>,
        /// Live records ordered by user id.
        users: Vec<PresenceRecord>,
    },
    /// Reply to `get_messages`.
    Messages {
        /// Room that was read.
        room_id: RoomId,
        /// Messages oldest first.
        messages: Vec<ChatMessage>,
    },
    /// Reply to `get_roster`.
    Roster {
        /// Room that was read.
        room_id: RoomId,
        /// Members in join order.
        roster: Vec<RosterEntry>,
    },
    /// Reply to presence writes with the caller's updated record.
    Presence {
        /// Updated record.
        record: PresenceRecord,
    },
    /// Error message.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

impl From<RoomEvent> for OutboundMessage {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::MembershipChanged {
                room_id,
                occupancy,
                roster,
            } => Self::RoomMembershipChanged {
                room_id,
                occupancy,
                roster,
            },
            RoomEvent::Message { room_id, message } => Self::RoomMessage { room_id, message },
        }
    }
}

impl From<&campus_core::AppError> for OutboundMessage {
    fn from(err: &campus_core::AppError) -> Self {
        Self::Error {
            code: err.kind.code().to_string(),
            message: err.message.clone(),
        }
    }
}
