//! Room metrics helpers.

use std::sync::atomic::Ordering;

use super::RealtimeMetrics;

impl RealtimeMetrics {
    /// Record a successful subscribe
    pub fn record_join(&self) {
        self.sessions_joined.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected subscribe
    pub fn record_rejected(&self) {
        self.sessions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an explicit unsubscribe
    pub fn record_leave(&self) {
        self.sessions_left.fetch_add(1, Ordering::Relaxed);
    }

    /// Record sessions expired by the sweep
    pub fn record_sessions_expired(&self, count: u64) {
        self.sessions_expired.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a published message
    pub fn record_published(&self) {
        self.messages_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Record room events that could not be queued
    pub fn record_dropped(&self, count: usize) {
        if count > 0 {
            self.events_dropped
                .fetch_add(count as u64, Ordering::Relaxed);
        }
    }

    /// Record a drift correction
    pub fn record_drift(&self) {
        self.drift_corrections.fetch_add(1, Ordering::Relaxed);
    }
}
