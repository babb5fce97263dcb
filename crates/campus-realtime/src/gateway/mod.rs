//! Synchronization gateway: the command/event boundary of the engine.
//!
//! Transports call these operations on behalf of a connected client. The
//! gateway enforces ownership (a client writes only its own presence and
//! addresses only its own sessions) and keeps presence and room state in
//! step: joining a room moves the user into the room's zone.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use campus_core::AppError;
use campus_core::config::RealtimeConfig;
use campus_core::result::AppResult;
use campus_core::traits::Clock;
use campus_core::types::{RoomId, SessionId, UserId, ZoneId};
use campus_entity::presence::{Position, PresenceRecord, PresenceStatus};
use campus_entity::room::{ChatMessage, RosterEntry};
use campus_entity::user::UserHandle;
use campus_entity::zone::Zone;

use crate::catalog::ZoneCatalog;
use crate::channel::registry::RoomRegistry;
use crate::channel::session::RoomSession;
use crate::connection::handle::ClientHandle;
use crate::connection::pool::ConnectionPool;
use crate::message::types::{PresenceChanged, RoomEvent, SessionHandle};
use crate::message::validator::normalize_status_message;
use crate::metrics::RealtimeMetrics;
use crate::presence::directory::PresenceDirectory;
use crate::presence::update::PresenceUpdate;

/// A successful join.
#[derive(Debug)]
pub struct JoinedRoom {
    /// Handle for later `say` / `leave` calls.
    pub handle: SessionHandle,
    /// Membership changes and messages for this session.
    pub events: mpsc::Receiver<RoomEvent>,
}

/// Occupancy of one room inside a zone summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomOccupancy {
    /// Room id.
    pub room_id: RoomId,
    /// Display name.
    pub name: String,
    /// Maximum concurrent sessions.
    pub capacity: u32,
    /// Cached occupancy; zero when the room has no live channel.
    pub occupancy: u32,
}

/// A zone with its live counts, as the map renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    /// The zone.
    pub zone: Zone,
    /// Live presence records currently in the zone.
    pub online: usize,
    /// Occupancy of each of the zone's rooms.
    pub rooms: Vec<RoomOccupancy>,
}

/// The command/event boundary.
#[derive(Debug)]
pub struct SyncGateway {
    catalog: Arc<ZoneCatalog>,
    presence: Arc<PresenceDirectory>,
    rooms: Arc<RoomRegistry>,
    connections: Arc<ConnectionPool>,
    clock: Arc<dyn Clock>,
    config: RealtimeConfig,
    metrics: Arc<RealtimeMetrics>,
}

impl SyncGateway {
    /// Wires the gateway over shared engine components.
    pub fn new(
        catalog: Arc<ZoneCatalog>,
        presence: Arc<PresenceDirectory>,
        rooms: Arc<RoomRegistry>,
        connections: Arc<ConnectionPool>,
        clock: Arc<dyn Clock>,
        config: RealtimeConfig,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            catalog,
            presence,
            rooms,
            connections,
            clock,
            config,
            metrics,
        }
    }

    /// Registers a connection and marks its user online.
    pub fn connect(&self, user: UserHandle) -> AppResult<Arc<ClientHandle>> {
        let client = Arc::new(ClientHandle::new(user, self.clock.now()));
        self.connections
            .add(client.clone(), self.config.max_connections_per_user)?;

        if let Err(e) = self.presence.upsert(
            client.user_id(),
            PresenceUpdate::heartbeat().with_display(client.user.display.clone()),
        ) {
            self.connections.remove(&client.id);
            return Err(e);
        }

        self.metrics.record_connect();
        info!(
            conn_id = %client.id,
            user_id = %client.user_id(),
            "Client connected"
        );
        Ok(client)
    }

    /// Drops every session of the connection and, once the user's last
    /// connection is gone, their presence. Idempotent.
    pub async fn disconnect(&self, client: &ClientHandle) {
        let left = self.rooms.unsubscribe_connection(client.id).await;

        let removed = self.connections.remove_with(&client.id, |user_id| {
            self.presence.remove(user_id);
        });
        if removed.is_none() {
            return;
        }

        self.metrics.record_disconnect();
        info!(
            conn_id = %client.id,
            user_id = %client.user_id(),
            sessions_closed = left.len(),
            "Client disconnected"
        );
    }

    /// Joins a zone's main room.
    pub async fn join(&self, client: &ClientHandle, zone_id: &ZoneId) -> AppResult<JoinedRoom> {
        let zone = self.catalog.require_active(zone_id)?;
        self.join_room(client, &RoomId::main_of(&zone.id)).await
    }

    /// Joins a room or sub-room and moves the user into its zone.
    pub async fn join_room(&self, client: &ClientHandle, room_id: &RoomId) -> AppResult<JoinedRoom> {
        self.ensure_connected(client)?;
        let zone_id = self.catalog.resolve_room(room_id)?.zone_id.clone();

        let subscription = self.rooms.subscribe(client.id, &client.user, room_id).await?;
        let session = subscription.session;

        let update = PresenceUpdate::heartbeat()
            .with_display(client.user.display.clone())
            .with_zone(Some(zone_id.clone()));
        if let Err(e) = self.presence.upsert(client.user_id(), update) {
            self.rooms.unsubscribe(&session.id).await;
            return Err(e);
        }

        Ok(JoinedRoom {
            handle: SessionHandle {
                session_id: session.id,
                room_id: session.room_id.clone(),
                zone_id,
            },
            events: subscription.events,
        })
    }

    /// Leaves a room. The user's presence zone is left untouched.
    pub async fn leave(&self, client: &ClientHandle, session_id: &SessionId) -> AppResult<SessionHandle> {
        let session = self.owned_session(client, session_id)?;
        self.rooms
            .unsubscribe(session_id)
            .await
            .ok_or_else(|| not_subscribed(session_id))?;

        let zone_id = self
            .catalog
            .room(&session.room_id)
            .map(|target| target.zone_id.clone())
            .ok_or_else(|| AppError::invalid_zone(&session.room_id))?;
        Ok(SessionHandle {
            session_id: session.id,
            room_id: session.room_id.clone(),
            zone_id,
        })
    }

    /// Publishes a chat message to the session's room.
    pub async fn say(&self, client: &ClientHandle, session_id: &SessionId, text: &str) -> AppResult<ChatMessage> {
        self.owned_session(client, session_id)?;
        self.rooms.publish(session_id, text).await
    }

    /// Moves a user on the map. Only the user's own connection may do so.
    pub fn move_user(&self, client: &ClientHandle, user_id: &UserId, position: Position) -> AppResult<PresenceRecord> {
        self.ensure_connected(client)?;
        if user_id != client.user_id() {
            return Err(AppError::forbidden(format!(
                "Connection for '{}' cannot move '{user_id}'",
                client.user_id()
            )));
        }
        self.refresh(
            client,
            PresenceUpdate::heartbeat()
                .with_display(client.user.display.clone())
                .with_position(position),
        )
    }

    /// Enters a zone on the map without joining its room; `None` leaves the
    /// current zone.
    pub fn enter_zone(&self, client: &ClientHandle, zone_id: Option<ZoneId>) -> AppResult<PresenceRecord> {
        self.ensure_connected(client)?;
        self.refresh(
            client,
            PresenceUpdate::heartbeat()
                .with_display(client.user.display.clone())
                .with_zone(zone_id),
        )
    }

    /// Keeps the user's presence and every session of the connection alive.
    pub fn heartbeat(&self, client: &ClientHandle) -> AppResult<PresenceRecord> {
        self.ensure_connected(client)?;
        self.refresh(
            client,
            PresenceUpdate::heartbeat().with_display(client.user.display.clone()),
        )
    }

    /// Changes the user's self-reported status.
    pub fn set_status(
        &self,
        client: &ClientHandle,
        status: PresenceStatus,
        message: Option<String>,
    ) -> AppResult<PresenceRecord> {
        self.ensure_connected(client)?;
        let message = normalize_status_message(message, self.config.max_status_message_length)?;
        self.refresh(
            client,
            PresenceUpdate::heartbeat()
                .with_display(client.user.display.clone())
                .with_status(status, message),
        )
    }

    /// Point-in-time list of live presence records, ordered by user id.
    pub fn presence_snapshot(&self, zone_id: Option<&ZoneId>) -> AppResult<Vec<PresenceRecord>> {
        self.presence.snapshot(zone_id)
    }

    /// Recent history of a room, oldest first.
    pub async fn get_messages(&self, room_id: &RoomId, limit: Option<usize>) -> AppResult<Vec<ChatMessage>> {
        self.rooms.messages(room_id, limit).await
    }

    /// Members of a room in join order.
    pub async fn get_roster(&self, room_id: &RoomId) -> AppResult<Vec<RosterEntry>> {
        self.rooms.roster(room_id).await
    }

    /// Zone catalog ordered by display name.
    pub fn zones(&self) -> &[Zone] {
        self.catalog.zones()
    }

    /// Every zone with its live presence count and per-room occupancy.
    pub async fn zone_summaries(&self) -> Vec<ZoneSummary> {
        let counts = self.presence.zone_counts();
        let occupancies = self.rooms.occupancies().await;

        self.catalog
            .zones()
            .iter()
            .map(|zone| ZoneSummary {
                online: counts.get(&zone.id).copied().unwrap_or(0),
                rooms: zone
                    .rooms
                    .iter()
                    .map(|room| RoomOccupancy {
                        room_id: room.id.clone(),
                        name: room.name.clone(),
                        capacity: room.capacity,
                        occupancy: occupancies.get(&room.id).copied().unwrap_or(0),
                    })
                    .collect(),
                zone: zone.clone(),
            })
            .collect()
    }

    /// Push path for presence diffs.
    pub fn presence_events(&self) -> broadcast::Receiver<PresenceChanged> {
        self.presence.subscribe()
    }

    /// Heartbeat timeout clients must stay within.
    pub fn heartbeat_timeout_seconds(&self) -> u64 {
        self.config.heartbeat_timeout_seconds
    }

    /// Disconnects every client.
    pub async fn close_all(&self) {
        for client in self.connections.all_connections() {
            self.disconnect(&client).await;
        }
    }

    fn ensure_connected(&self, client: &ClientHandle) -> AppResult<()> {
        if self.connections.get(&client.id).is_none() {
            return Err(AppError::not_subscribed(format!(
                "Connection {} is not registered",
                client.id
            )));
        }
        Ok(())
    }

    /// Any client activity counts as a heartbeat for the user's presence
    /// and for every session of the connection.
    fn refresh(&self, client: &ClientHandle, update: PresenceUpdate) -> AppResult<PresenceRecord> {
        let record = self.presence.upsert(client.user_id(), update)?;
        let touched = self.rooms.touch_connection(client.id);
        debug!(conn_id = %client.id, sessions = touched, "Client activity");
        Ok(record)
    }

    fn owned_session(&self, client: &ClientHandle, session_id: &SessionId) -> AppResult<Arc<RoomSession>> {
        self.ensure_connected(client)?;
        self.rooms
            .session(session_id)
            .filter(|session| session.connection_id == client.id && session.is_alive())
            .ok_or_else(|| not_subscribed(session_id))
    }
}

fn not_subscribed(session_id: &SessionId) -> AppError {
    AppError::not_subscribed(format!("Session {session_id} is not a live session of this connection"))
}
