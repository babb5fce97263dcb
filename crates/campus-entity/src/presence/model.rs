//! Presence record value object.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use campus_core::types::{UserId, ZoneId};

use super::PresenceStatus;
use crate::user::DisplayAttrs;

/// A point on the campus map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal map coordinate.
    pub x: f64,
    /// Vertical map coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// "Who is online and where" for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// Owner of the record.
    pub user_id: UserId,
    /// Display attributes of the most recent connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayAttrs>,
    /// Current zone, if any.
    pub zone_id: Option<ZoneId>,
    /// Current map position, if any.
    pub position: Option<Position>,
    /// Self-reported status.
    #[serde(default)]
    pub status: PresenceStatus,
    /// Free-text status line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    /// Last time the owning client proved it was alive.
    pub last_heartbeat_at: DateTime<Utc>,
}

impl PresenceRecord {
    /// A fresh record with no zone and the default status.
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            display: None,
            zone_id: None,
            position: None,
            status: PresenceStatus::default(),
            status_message: None,
            last_heartbeat_at: now,
        }
    }

    /// A record is alive while `now - last_heartbeat_at < timeout`.
    pub fn is_alive(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now.signed_duration_since(self.last_heartbeat_at) < timeout
    }
}
