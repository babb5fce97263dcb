//! Room registry: owns every live room and the session index.
//!
//! Rooms are created lazily on first subscribe and destroyed by the sweep
//! once they have been empty for the idle grace period. Silent sessions are
//! expired by the sweep and also on every read or join of their room, so a
//! roster never lists a member whose heartbeat has lapsed. Each room sits
//! behind its own async mutex; the map guard is always released before that
//! mutex is awaited.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use campus_core::AppError;
use campus_core::config::RealtimeConfig;
use campus_core::result::AppResult;
use campus_core::traits::Clock;
use campus_core::types::{ConnectionId, RoomId, SessionId};
use campus_entity::room::{ChatMessage, RosterEntry};
use campus_entity::user::UserHandle;

use super::room::{Room, RoomReconcile};
use super::session::RoomSession;
use super::subscription::SubscriptionTracker;
use crate::catalog::{RoomTarget, ZoneCatalog};
use crate::message::types::RoomEvent;
use crate::message::validator::validate_chat_body;
use crate::metrics::RealtimeMetrics;

/// A successful subscribe: the session plus its event stream.
#[derive(Debug)]
pub struct Subscription {
    /// The new session.
    pub session: Arc<RoomSession>,
    /// Membership changes and messages for this session, in room order.
    pub events: mpsc::Receiver<RoomEvent>,
}

/// What one registry sweep did.
#[derive(Debug, Default)]
pub struct RoomSweep {
    /// Sessions removed as silent or dead.
    pub expired: Vec<Arc<RoomSession>>,
    /// Rooms whose cached occupancy had drifted.
    pub rooms_corrected: usize,
    /// Rooms destroyed after the idle grace period.
    pub rooms_destroyed: usize,
}

/// Registry of all live rooms.
#[derive(Debug)]
pub struct RoomRegistry {
    /// Room id → room.
    rooms: DashMap<RoomId, Arc<Mutex<Room>>>,
    /// Session id → session, for every rostered session.
    sessions: DashMap<SessionId, Arc<RoomSession>>,
    /// Connection → sessions (reverse index).
    subscriptions: SubscriptionTracker,
    /// Room lookup and validation.
    catalog: Arc<ZoneCatalog>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Limits and timeouts.
    config: RealtimeConfig,
    /// Shared counters.
    metrics: Arc<RealtimeMetrics>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new(
        catalog: Arc<ZoneCatalog>,
        clock: Arc<dyn Clock>,
        config: RealtimeConfig,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            rooms: DashMap::new(),
            sessions: DashMap::new(),
            subscriptions: SubscriptionTracker::new(),
            catalog,
            clock,
            config,
            metrics,
        }
    }

    /// Subscribes a connection to a room, creating the room if needed.
    ///
    /// Fails with `InvalidZone` for unknown or inactive rooms and with
    /// `RoomFull` at capacity; a failed subscribe leaves no roster entry.
    pub async fn subscribe(
        &self,
        connection_id: ConnectionId,
        user: &UserHandle,
        room_id: &RoomId,
    ) -> AppResult<Subscription> {
        let target = match self.catalog.resolve_room(room_id) {
            Ok(target) => target.clone(),
            Err(e) => {
                self.metrics.record_rejected();
                return Err(e);
            }
        };

        let (tx, events) = mpsc::channel(self.config.session_buffer_size.max(1));
        let session = Arc::new(RoomSession::new(
            user.user_id.clone(),
            connection_id,
            user.display.clone(),
            target.room_id.clone(),
            tx,
            self.clock.now(),
        ));

        loop {
            let handle = self.room_handle(&target);
            let mut room = handle.lock().await;
            if room.is_closed() {
                // Destroyed by the sweep between lookup and lock.
                continue;
            }
            self.expire_stale(&mut room, self.clock.now());

            match room.admit(session.clone()) {
                Ok(dropped) => {
                    self.sessions.insert(session.id, session.clone());
                    self.subscriptions.add(connection_id, session.id);
                    self.metrics.record_join();
                    self.metrics.record_dropped(dropped);
                    info!(
                        conn_id = %connection_id,
                        user_id = %user.user_id,
                        room_id = %target.room_id,
                        session_id = %session.id,
                        occupancy = room.occupancy(),
                        "Joined room"
                    );
                    break;
                }
                Err(e) => {
                    self.metrics.record_rejected();
                    debug!(
                        user_id = %user.user_id,
                        room_id = %target.room_id,
                        error = %e,
                        "Room subscribe rejected"
                    );
                    return Err(e);
                }
            }
        }

        Ok(Subscription { session, events })
    }

    /// Removes a session from its room. Idempotent: returns `None` if the
    /// session is unknown or already gone.
    pub async fn unsubscribe(&self, session_id: &SessionId) -> Option<Arc<RoomSession>> {
        let (_, session) = self.sessions.remove(session_id)?;
        self.subscriptions.remove(session.connection_id, session_id);

        if let Some(handle) = self.existing_room(&session.room_id) {
            let mut room = handle.lock().await;
            if let Some((_, dropped)) = room.remove(session_id, self.clock.now()) {
                self.metrics.record_dropped(dropped);
                info!(
                    user_id = %session.user_id,
                    room_id = %session.room_id,
                    session_id = %session_id,
                    occupancy = room.occupancy(),
                    "Left room"
                );
            }
        }

        self.metrics.record_leave();
        Some(session)
    }

    /// Unsubscribes every session a connection owns.
    pub async fn unsubscribe_connection(&self, connection_id: ConnectionId) -> Vec<Arc<RoomSession>> {
        let mut removed = Vec::new();
        for session_id in self.subscriptions.remove_all(connection_id) {
            if let Some(session) = self.unsubscribe(&session_id).await {
                removed.push(session);
            }
        }
        removed
    }

    /// Publishes a chat message through a session.
    pub async fn publish(&self, session_id: &SessionId, body: &str) -> AppResult<ChatMessage> {
        let session = self.session(session_id).ok_or_else(|| not_subscribed(session_id))?;
        let body = validate_chat_body(body, self.config.max_message_length)?;

        let handle = self
            .existing_room(&session.room_id)
            .ok_or_else(|| not_subscribed(session_id))?;
        let mut room = handle.lock().await;
        let (message, dropped) = room.publish(session_id, body, self.clock.now())?;

        self.metrics.record_published();
        self.metrics.record_dropped(dropped);
        debug!(
            room_id = %message.room_id,
            message_id = message.id,
            sender = %message.sender_user_id,
            "Message published"
        );
        Ok(message)
    }

    /// The most recent `limit` messages of a room, oldest first.
    ///
    /// `None` uses the configured default; limits are clamped to the log
    /// capacity. A known room that currently has no channel yields an empty
    /// list.
    pub async fn messages(&self, room_id: &RoomId, limit: Option<usize>) -> AppResult<Vec<ChatMessage>> {
        self.known_room(room_id)?;
        let limit = limit
            .unwrap_or(self.config.default_history_limit)
            .min(self.config.message_log_capacity);

        match self.existing_room(room_id) {
            Some(handle) => Ok(handle.lock().await.recent_messages(limit)),
            None => Ok(Vec::new()),
        }
    }

    /// A room's live members in join order.
    pub async fn roster(&self, room_id: &RoomId) -> AppResult<Vec<RosterEntry>> {
        self.known_room(room_id)?;
        match self.existing_room(room_id) {
            Some(handle) => {
                let mut room = handle.lock().await;
                self.expire_stale(&mut room, self.clock.now());
                Ok(room.roster_view())
            }
            None => Ok(Vec::new()),
        }
    }

    /// A room's occupancy over live sessions.
    pub async fn occupancy(&self, room_id: &RoomId) -> AppResult<u32> {
        self.known_room(room_id)?;
        match self.existing_room(room_id) {
            Some(handle) => {
                let mut room = handle.lock().await;
                self.expire_stale(&mut room, self.clock.now());
                Ok(room.occupancy())
            }
            None => Ok(0),
        }
    }

    /// Live occupancy of every room that has a channel.
    pub async fn occupancies(&self) -> HashMap<RoomId, u32> {
        let now = self.clock.now();
        let mut out = HashMap::new();
        for (room_id, handle) in self.room_handles() {
            let mut room = handle.lock().await;
            self.expire_stale(&mut room, now);
            out.insert(room_id, room.occupancy());
        }
        out
    }

    /// Refreshes the heartbeat of every session a connection owns.
    pub fn touch_connection(&self, connection_id: ConnectionId) -> usize {
        let now = self.clock.now();
        self.subscriptions
            .get_sessions(connection_id)
            .iter()
            .filter_map(|id| self.session(id))
            .inspect(|session| session.touch(now))
            .count()
    }

    /// Looks up a rostered session.
    pub fn session(&self, session_id: &SessionId) -> Option<Arc<RoomSession>> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// Reconciles every room: corrects occupancy drift, expires silent or
    /// dead sessions and destroys rooms idle past the grace period.
    pub async fn sweep(&self) -> RoomSweep {
        let now = self.clock.now();
        let grace = self.config.room_idle_grace();
        let mut report = RoomSweep::default();

        for (room_id, handle) in self.room_handles() {
            let mut room = handle.lock().await;
            if room.is_closed() {
                continue;
            }

            let outcome = self.expire_stale(&mut room, now);
            if outcome.drift.is_some() {
                report.rooms_corrected += 1;
            }
            report.expired.extend(outcome.expired);

            if room.is_idle(now, grace) {
                room.close();
                self.rooms
                    .remove_if(&room_id, |_, current| Arc::ptr_eq(current, &handle));
                report.rooms_destroyed += 1;
                debug!(room_id = %room_id, "Idle room destroyed");
            }
        }

        report
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of rostered sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Reconciles one locked room and drops its expired sessions from the
    /// session index.
    fn expire_stale(&self, room: &mut Room, now: DateTime<Utc>) -> RoomReconcile {
        let outcome = room.reconcile(now, self.config.heartbeat_timeout());
        self.metrics.record_dropped(outcome.dropped);

        if let Some((cached, actual)) = outcome.drift {
            warn!(
                room_id = %room.id,
                cached_occupancy = cached,
                roster_size = actual,
                delta = cached as i64 - actual as i64,
                "Occupancy drift detected, corrected"
            );
            self.metrics.record_drift();
        }

        for session in &outcome.expired {
            self.sessions.remove(&session.id);
            self.subscriptions.remove(session.connection_id, &session.id);
            info!(
                user_id = %session.user_id,
                room_id = %room.id,
                session_id = %session.id,
                alive = session.is_alive(),
                "Session expired"
            );
        }
        self.metrics
            .record_sessions_expired(outcome.expired.len() as u64);
        outcome
    }

    fn room_handle(&self, target: &RoomTarget) -> Arc<Mutex<Room>> {
        let now = self.clock.now();
        let capacity = self.config.message_log_capacity;
        self.rooms
            .entry(target.room_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Room::new(target, capacity, now))))
            .value()
            .clone()
    }

    fn existing_room(&self, room_id: &RoomId) -> Option<Arc<Mutex<Room>>> {
        self.rooms.get(room_id).map(|entry| entry.value().clone())
    }

    fn room_handles(&self) -> Vec<(RoomId, Arc<Mutex<Room>>)> {
        self.rooms
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn known_room(&self, room_id: &RoomId) -> AppResult<()> {
        self.catalog
            .room(room_id)
            .map(|_| ())
            .ok_or_else(|| AppError::invalid_zone(room_id))
    }
}

fn not_subscribed(session_id: &SessionId) -> AppError {
    AppError::not_subscribed(format!("Session {session_id} is not subscribed to any room"))
}

