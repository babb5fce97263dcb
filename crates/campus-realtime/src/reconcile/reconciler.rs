//! Occupancy reconciler.
//!
//! Occupancy is a cache updated in the same critical section as every
//! roster change. The sweep re-derives it from the roster, reports drift,
//! and applies heartbeat expiry to sessions and presence records.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::channel::registry::RoomRegistry;
use crate::metrics::RealtimeMetrics;
use crate::presence::directory::PresenceDirectory;

/// What one sweep changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Presence records removed for missing heartbeats.
    pub presence_expired: usize,
    /// Room sessions removed as silent or dead.
    pub sessions_expired: usize,
    /// Rooms whose cached occupancy had drifted.
    pub rooms_corrected: usize,
    /// Empty rooms destroyed after the idle grace period.
    pub rooms_destroyed: usize,
}

impl SweepReport {
    /// Whether the sweep changed anything.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Reconciles room occupancy against rosters and expires silent clients.
#[derive(Debug, Clone)]
pub struct OccupancyReconciler {
    /// Presence table to expire.
    presence: Arc<PresenceDirectory>,
    /// Rooms to reconcile.
    rooms: Arc<RoomRegistry>,
    /// Shared counters.
    metrics: Arc<RealtimeMetrics>,
}

impl OccupancyReconciler {
    /// Creates a new reconciler.
    pub fn new(
        presence: Arc<PresenceDirectory>,
        rooms: Arc<RoomRegistry>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            presence,
            rooms,
            metrics,
        }
    }

    /// Performs a full reconciliation cycle:
    ///
    /// 1. Reconcile every room: correct occupancy drift, expire silent and
    ///    dead sessions, destroy rooms idle past the grace period.
    /// 2. Evict presence records whose heartbeat lapsed.
    pub async fn sweep(&self) -> SweepReport {
        debug!("Running occupancy reconciliation");

        let rooms = self.rooms.sweep().await;
        let expired_users = self.presence.evict_expired();

        let report = SweepReport {
            presence_expired: expired_users.len(),
            sessions_expired: rooms.expired.len(),
            rooms_corrected: rooms.rooms_corrected,
            rooms_destroyed: rooms.rooms_destroyed,
        };
        self.metrics.record_sweep();

        if !report.is_noop() {
            info!(
                presence_expired = report.presence_expired,
                sessions_expired = report.sessions_expired,
                rooms_corrected = report.rooms_corrected,
                rooms_destroyed = report.rooms_destroyed,
                "Reconciliation sweep completed"
            );
        }
        report
    }
}
