//! Connection metrics helpers.

use std::sync::atomic::Ordering;

use super::RealtimeMetrics;

impl RealtimeMetrics {
    /// Record a new connection
    pub fn record_connect(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a disconnection
    pub fn record_disconnect(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Connections currently open
    pub fn connections_active(&self) -> u64 {
        self.connections_opened
            .load(Ordering::Relaxed)
            .saturating_sub(self.connections_closed.load(Ordering::Relaxed))
    }
}
