//! Client connection handle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use campus_core::types::{ConnectionId, UserId};
use campus_entity::user::UserHandle;

/// Binds one client connection to the user it authenticated as.
///
/// Every gateway command takes the caller's handle; a connection may only
/// write presence for its own user and address its own sessions.
#[derive(Debug, Clone, Serialize)]
pub struct ClientHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Authenticated user
    pub user: UserHandle,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
}

impl ClientHandle {
    /// Create a new handle with a fresh connection id
    pub fn new(user: UserHandle, now: DateTime<Utc>) -> Self {
        Self {
            id: ConnectionId::new(),
            user,
            connected_at: now,
        }
    }

    /// The connected user's id
    pub fn user_id(&self) -> &UserId {
        &self.user.user_id
    }
}
