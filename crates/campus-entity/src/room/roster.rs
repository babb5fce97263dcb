//! Room roster entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_core::types::{SessionId, UserId};

use crate::user::DisplayAttrs;

/// A member of a room as other members see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// The member's session.
    pub session_id: SessionId,
    /// The member's user id.
    pub user_id: UserId,
    /// The member's display attributes.
    pub display: DisplayAttrs,
    /// When the session subscribed.
    pub joined_at: DateTime<Utc>,
}
