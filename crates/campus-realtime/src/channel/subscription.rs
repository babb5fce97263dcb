//! Subscription tracking: which room sessions each connection owns.

use std::collections::HashSet;

use dashmap::DashMap;

use campus_core::types::{ConnectionId, SessionId};

/// Tracks connection-to-session mappings (reverse index).
#[derive(Debug, Default)]
pub struct SubscriptionTracker {
    /// Connection ID → set of session IDs.
    conn_to_sessions: DashMap<ConnectionId, HashSet<SessionId>>,
}

impl SubscriptionTracker {
    /// Creates a new subscription tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a subscription.
    pub fn add(&self, conn_id: ConnectionId, session_id: SessionId) {
        self.conn_to_sessions
            .entry(conn_id)
            .or_default()
            .insert(session_id);
    }

    /// Removes a subscription, dropping the connection entry once empty.
    pub fn remove(&self, conn_id: ConnectionId, session_id: &SessionId) {
        if let Some(mut sessions) = self.conn_to_sessions.get_mut(&conn_id) {
            sessions.remove(session_id);
        }
        self.conn_to_sessions
            .remove_if(&conn_id, |_, sessions| sessions.is_empty());
    }

    /// Gets all sessions a connection owns.
    pub fn get_sessions(&self, conn_id: ConnectionId) -> HashSet<SessionId> {
        self.conn_to_sessions
            .get(&conn_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Removes all subscriptions for a connection.
    pub fn remove_all(&self, conn_id: ConnectionId) -> HashSet<SessionId> {
        self.conn_to_sessions
            .remove(&conn_id)
            .map(|(_, sessions)| sessions)
            .unwrap_or_default()
    }
}
