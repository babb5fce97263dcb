//! Presence directory: the process-wide `user → PresenceRecord` table.
//!
//! Each record is replaced atomically under its map shard lock, so updates
//! for one user never interleave while unrelated users never contend.
//! Expiry is lazy: reads drop stale records, and the reconciliation sweep
//! calls [`PresenceDirectory::evict_expired`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use campus_core::AppError;
use campus_core::result::AppResult;
use campus_core::traits::Clock;
use campus_core::types::{UserId, ZoneId};
use campus_entity::presence::PresenceRecord;

use super::update::{FieldUpdate, PresenceUpdate};
use crate::catalog::ZoneCatalog;
use crate::message::types::PresenceChanged;
use crate::metrics::RealtimeMetrics;

/// Authoritative presence table.
#[derive(Debug)]
pub struct PresenceDirectory {
    /// User ID → current record.
    records: DashMap<UserId, PresenceRecord>,
    /// Zone validation.
    catalog: Arc<ZoneCatalog>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Records older than this are dead.
    timeout: Duration,
    /// Global presence diff stream.
    events: broadcast::Sender<PresenceChanged>,
    /// Shared counters.
    metrics: Arc<RealtimeMetrics>,
}

impl PresenceDirectory {
    /// Creates an empty directory.
    pub fn new(
        catalog: Arc<ZoneCatalog>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
        event_buffer: usize,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self {
            records: DashMap::new(),
            catalog,
            clock,
            timeout,
            events,
            metrics,
        }
    }

    /// Creates or updates a user's record and refreshes its heartbeat.
    ///
    /// Fails with `InvalidZone` before touching any state if the update
    /// names a zone the catalog does not accept.
    pub fn upsert(&self, user_id: &UserId, update: PresenceUpdate) -> AppResult<PresenceRecord> {
        if user_id.is_blank() {
            return Err(AppError::validation("user id must not be empty"));
        }
        if let FieldUpdate::Set(zone_id) = &update.zone_id {
            self.catalog.require_active(zone_id)?;
        }
        if let FieldUpdate::Set(position) = &update.position {
            if !position.is_finite() {
                return Err(AppError::validation("position coordinates must be finite"));
            }
        }

        let now = self.clock.now();
        let mut entry = self
            .records
            .entry(user_id.clone())
            .or_insert_with(|| PresenceRecord::new(user_id.clone(), now));

        // A record that lapsed but was not yet swept starts over.
        let mut next = if entry.is_alive(now, self.timeout) {
            entry.clone()
        } else {
            PresenceRecord::new(user_id.clone(), now)
        };
        update.apply_to(&mut next);
        next.last_heartbeat_at = now;
        *entry = next.clone();

        // Sent under the shard lock so diffs for one user stay ordered.
        let _ = self.events.send(PresenceChanged::online(&next));
        drop(entry);

        Ok(next)
    }

    /// Live records, optionally restricted to one zone, ordered by user id.
    ///
    /// Evicts every expired record first.
    pub fn snapshot(&self, zone_id: Option<&ZoneId>) -> AppResult<Vec<PresenceRecord>> {
        if let Some(zone_id) = zone_id {
            if !self.catalog.contains(zone_id) {
                return Err(AppError::invalid_zone(zone_id));
            }
        }

        self.evict_expired();

        let now = self.clock.now();
        let mut records: Vec<PresenceRecord> = self
            .records
            .iter()
            .filter(|entry| entry.is_alive(now, self.timeout))
            .filter(|entry| zone_id.is_none() || entry.zone_id.as_ref() == zone_id)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(records)
    }

    /// A user's live record.
    pub fn get(&self, user_id: &UserId) -> Option<PresenceRecord> {
        let now = self.clock.now();
        if let Some((_, stale)) = self
            .records
            .remove_if(user_id, |_, record| !record.is_alive(now, self.timeout))
        {
            self.announce_expired(&stale);
            return None;
        }
        self.records.get(user_id).map(|entry| entry.value().clone())
    }

    /// Removes a user's record. Idempotent.
    pub fn remove(&self, user_id: &UserId) -> Option<PresenceRecord> {
        let (_, record) = self.records.remove(user_id)?;
        let _ = self.events.send(PresenceChanged::offline(&record));
        debug!(user_id = %user_id, "Presence removed");
        Some(record)
    }

    /// Removes every record whose heartbeat is older than the timeout.
    ///
    /// Staleness is re-checked atomically per key, so a heartbeat that
    /// lands between the scan and the removal keeps its record.
    pub fn evict_expired(&self) -> Vec<UserId> {
        let now = self.clock.now();
        let candidates: Vec<UserId> = self
            .records
            .iter()
            .filter(|entry| !entry.is_alive(now, self.timeout))
            .map(|entry| entry.key().clone())
            .collect();

        let mut expired = Vec::with_capacity(candidates.len());
        for user_id in candidates {
            if let Some((_, record)) = self
                .records
                .remove_if(&user_id, |_, record| !record.is_alive(now, self.timeout))
            {
                self.announce_expired(&record);
                expired.push(user_id);
            }
        }
        expired
    }

    /// Live users per zone.
    pub fn zone_counts(&self) -> HashMap<ZoneId, usize> {
        let now = self.clock.now();
        let mut counts = HashMap::new();
        for entry in self.records.iter() {
            if !entry.is_alive(now, self.timeout) {
                continue;
            }
            if let Some(zone_id) = &entry.zone_id {
                *counts.entry(zone_id.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Number of live records.
    pub fn online_count(&self) -> usize {
        let now = self.clock.now();
        self.records
            .iter()
            .filter(|entry| entry.is_alive(now, self.timeout))
            .count()
    }

    /// Subscribes to the global presence diff stream.
    pub fn subscribe(&self) -> broadcast::Receiver<PresenceChanged> {
        self.events.subscribe()
    }

    fn announce_expired(&self, record: &PresenceRecord) {
        let lapse = AppError::stale_presence(format!(
            "no heartbeat since {}",
            record.last_heartbeat_at
        ));
        debug!(user_id = %record.user_id, reason = %lapse, "Presence expired");
        self.metrics.record_presence_expired(1);
        let _ = self.events.send(PresenceChanged::offline(record));
    }
}
