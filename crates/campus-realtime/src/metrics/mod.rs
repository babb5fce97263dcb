//! Realtime engine metrics.

pub mod connections;
pub mod rooms;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Total connections opened
    pub connections_opened: AtomicU64,
    /// Total connections closed
    pub connections_closed: AtomicU64,
    /// Total successful room subscriptions
    pub sessions_joined: AtomicU64,
    /// Total subscriptions rejected (room full, invalid zone)
    pub sessions_rejected: AtomicU64,
    /// Total explicit unsubscribes
    pub sessions_left: AtomicU64,
    /// Total sessions expired by the sweep
    pub sessions_expired: AtomicU64,
    /// Total chat messages published
    pub messages_published: AtomicU64,
    /// Total room events that could not be queued
    pub events_dropped: AtomicU64,
    /// Total presence records expired
    pub presence_expired: AtomicU64,
    /// Total rooms whose cached occupancy had drifted
    pub drift_corrections: AtomicU64,
    /// Total reconciliation sweeps
    pub sweeps_run: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record presence records that lapsed
    pub fn record_presence_expired(&self, count: u64) {
        self.presence_expired.fetch_add(count, Ordering::Relaxed);
    }

    /// Record one completed sweep
    pub fn record_sweep(&self) {
        self.sweeps_run.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            sessions_joined: self.sessions_joined.load(Ordering::Relaxed),
            sessions_rejected: self.sessions_rejected.load(Ordering::Relaxed),
            sessions_left: self.sessions_left.load(Ordering::Relaxed),
            sessions_expired: self.sessions_expired.load(Ordering::Relaxed),
            messages_published: self.messages_published.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            presence_expired: self.presence_expired.load(Ordering::Relaxed),
            drift_corrections: self.drift_corrections.load(Ordering::Relaxed),
            sweeps_run: self.sweeps_run.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections opened
    pub connections_opened: u64,
    /// Total connections closed
    pub connections_closed: u64,
    /// Total successful room subscriptions
    pub sessions_joined: u64,
    /// Total rejected subscriptions
    pub sessions_rejected: u64,
    /// Total explicit unsubscribes
    pub sessions_left: u64,
    /// Total sessions expired by the sweep
    pub sessions_expired: u64,
    /// Total chat messages published
    pub messages_published: u64,
    /// Total undeliverable room events
    pub events_dropped: u64,
    /// Total presence records expired
    pub presence_expired: u64,
    /// Total drift corrections
    pub drift_corrections: u64,
    /// Total reconciliation sweeps
    pub sweeps_run: u64,
}
