//! Connection pool: tracks all active connections indexed by user ID.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::warn;

use campus_core::AppError;
use campus_core::result::AppResult;
use campus_core::types::{ConnectionId, UserId};

use super::handle::ClientHandle;

/// Thread-safe pool of all active client connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// User ID → connection handles (one user can have multiple tabs).
    by_user: DashMap<UserId, Vec<Arc<ClientHandle>>>,
    /// Connection ID → connection handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ClientHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection, refusing it once the user already has
    /// `max_per_user` connections.
    pub fn add(&self, handle: Arc<ClientHandle>, max_per_user: usize) -> AppResult<()> {
        {
            let mut connections = self.by_user.entry(handle.user_id().clone()).or_default();
            if connections.len() >= max_per_user {
                warn!(
                    user_id = %handle.user_id(),
                    count = connections.len(),
                    max = max_per_user,
                    "User at max connections, refusing new connection"
                );
                return Err(AppError::forbidden(format!(
                    "User already has the maximum of {max_per_user} connections"
                )));
            }
            connections.push(handle.clone());
        }
        self.by_id.insert(handle.id, handle);
        Ok(())
    }

    /// Removes a connection and returns it with the number of connections
    /// the user still has.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<(Arc<ClientHandle>, usize)> {
        self.remove_with(conn_id, |_| {})
    }

    /// Like [`remove`](Self::remove), but runs `on_last` when the user has no
    /// connections left. `on_last` runs while the user's entry is still
    /// locked: an `add` for the same user completes either before the count
    /// is taken or after `on_last` returns.
    pub fn remove_with(
        &self,
        conn_id: &ConnectionId,
        on_last: impl FnOnce(&UserId),
    ) -> Option<(Arc<ClientHandle>, usize)> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        let user_id = handle.user_id().clone();

        let remaining = match self.by_user.entry(user_id.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().retain(|c| c.id != *conn_id);
                let remaining = entry.get().len();
                if remaining == 0 {
                    on_last(&user_id);
                    entry.remove();
                }
                remaining
            }
            Entry::Vacant(_) => {
                on_last(&user_id);
                0
            }
        };

        Some((handle, remaining))
    }

    /// Gets all connections for a user.
    pub fn get_user_connections(&self, user_id: &UserId) -> Vec<Arc<ClientHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ClientHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Returns all connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ClientHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
