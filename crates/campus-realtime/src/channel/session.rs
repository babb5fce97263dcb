//! A single room subscription and its outbound event queue.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc;
use tracing::warn;

use campus_core::types::{ConnectionId, RoomId, SessionId, UserId};
use campus_entity::room::RosterEntry;
use campus_entity::user::DisplayAttrs;

use crate::message::types::RoomEvent;

/// One user's membership in one room.
///
/// Holds the sender half of the session's bounded event queue. Once a send
/// fails the session is dead: it receives nothing further, may not publish,
/// and the next sweep removes it from the roster.
#[derive(Debug)]
pub struct RoomSession {
    /// Unique session ID
    pub id: SessionId,
    /// Member
    pub user_id: UserId,
    /// Connection that owns the session
    pub connection_id: ConnectionId,
    /// Member's display attributes
    pub display: DisplayAttrs,
    /// Joined room
    pub room_id: RoomId,
    /// When the session subscribed
    pub subscribed_at: DateTime<Utc>,
    /// Sender for room events
    outbox: mpsc::Sender<RoomEvent>,
    /// Last heartbeat, milliseconds since the epoch
    last_heartbeat_ms: AtomicI64,
    /// Whether the session can still receive events
    alive: AtomicBool,
}

impl RoomSession {
    /// Create a new session
    pub fn new(
        user_id: UserId,
        connection_id: ConnectionId,
        display: DisplayAttrs,
        room_id: RoomId,
        outbox: mpsc::Sender<RoomEvent>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            connection_id,
            display,
            room_id,
            subscribed_at: now,
            outbox,
            last_heartbeat_ms: AtomicI64::new(now.timestamp_millis()),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue an event without waiting. Returns `false` if it was dropped.
    pub fn deliver(&self, event: RoomEvent) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.outbox.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    session_id = %self.id,
                    room_id = %self.room_id,
                    "Session queue full, marking session dead"
                );
                self.mark_dead();
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if session is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark session as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Record a heartbeat
    pub fn touch(&self, now: DateTime<Utc>) {
        self.last_heartbeat_ms
            .fetch_max(now.timestamp_millis(), Ordering::SeqCst);
    }

    /// Last recorded heartbeat
    pub fn last_heartbeat(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_heartbeat_ms.load(Ordering::SeqCst))
            .unwrap_or(self.subscribed_at)
    }

    /// Dead, or silent for at least `timeout`.
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        !self.is_alive() || now.signed_duration_since(self.last_heartbeat()) >= timeout
    }

    /// How other members see this session.
    pub fn roster_entry(&self) -> RosterEntry {
        RosterEntry {
            session_id: self.id,
            user_id: self.user_id.clone(),
            display: self.display.clone(),
            joined_at: self.subscribed_at,
        }
    }
}
