//! Per-connection JSON command driver.
//!
//! Transport-agnostic: the transport feeds text frames to
//! [`ConnectionDriver::handle_text`] and drains the outbound receiver. Each
//! joined session's event stream and the global presence stream are
//! forwarded into that single outbound queue.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use campus_core::AppError;
use campus_core::result::AppResult;
use campus_core::types::SessionId;
use campus_entity::user::UserHandle;

use super::handle::ClientHandle;
use crate::gateway::{JoinedRoom, SyncGateway};
use crate::message::types::{InboundCommand, OutboundMessage, RoomEvent};
use crate::message::validator::validate_frame;

/// Error code for frames that are not valid commands.
pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";

/// Drives one client connection.
#[derive(Debug)]
pub struct ConnectionDriver {
    gateway: Arc<SyncGateway>,
    client: Arc<ClientHandle>,
    outbound: mpsc::Sender<OutboundMessage>,
    /// Session ID → task forwarding that session's room events.
    forwarders: HashMap<SessionId, JoinHandle<()>>,
    /// Task forwarding the global presence stream.
    presence_task: JoinHandle<()>,
}

impl ConnectionDriver {
    /// Connects the user, queues the `welcome` frame and starts forwarding
    /// presence diffs.
    pub async fn start(
        gateway: Arc<SyncGateway>,
        user: UserHandle,
        buffer: usize,
    ) -> AppResult<(Self, mpsc::Receiver<OutboundMessage>)> {
        let (outbound, outbound_rx) = mpsc::channel(buffer.max(1));

        // Subscribe before connecting so the user's own arrival is seen.
        let presence_rx = gateway.presence_events();
        let client = gateway.connect(user)?;

        let welcome = OutboundMessage::Welcome {
            connection_id: client.id,
            user_id: client.user_id().clone(),
            heartbeat_timeout_seconds: gateway.heartbeat_timeout_seconds(),
            zones: gateway.zones().to_vec(),
        };
        if outbound.send(welcome).await.is_err() {
            gateway.disconnect(&client).await;
            return Err(AppError::service_unavailable("Connection closed during handshake"));
        }

        let presence_task = tokio::spawn(forward_presence(presence_rx, outbound.clone()));

        Ok((
            Self {
                gateway,
                client,
                outbound,
                forwarders: HashMap::new(),
                presence_task,
            },
            outbound_rx,
        ))
    }

    /// The connection this driver serves.
    pub fn client(&self) -> &Arc<ClientHandle> {
        &self.client
    }

    /// Parses and executes one text frame. Failures are reported to the
    /// client as `error` frames; the connection stays open.
    pub async fn handle_text(&mut self, raw: &str) {
        let command = match validate_frame(raw)
            .and_then(|()| serde_json::from_str::<InboundCommand>(raw).map_err(AppError::from))
        {
            Ok(command) => command,
            Err(e) => {
                debug!(conn_id = %self.client.id, error = %e, "Invalid inbound frame");
                self.send(OutboundMessage::Error {
                    code: INVALID_MESSAGE.to_string(),
                    message: e.message,
                })
                .await;
                return;
            }
        };

        match self.dispatch(command).await {
            Ok(Some(reply)) => self.send(reply).await,
            Ok(None) => {}
            Err(e) => self.send(OutboundMessage::from(&e)).await,
        }
    }

    /// Stops all forwarding and disconnects the client.
    pub async fn close(mut self) {
        for (_, task) in self.forwarders.drain() {
            task.abort();
        }
        self.presence_task.abort();
        self.gateway.disconnect(&self.client).await;
    }

    async fn dispatch(&mut self, command: InboundCommand) -> AppResult<Option<OutboundMessage>> {
        let gw = self.gateway.clone();
        let client = self.client.clone();

        let reply = match command {
            InboundCommand::Join { zone_id } => {
                let joined = gw.join(&client, &zone_id).await?;
                self.start_forwarding(joined).await;
                return Ok(None);
            }
            InboundCommand::JoinRoom { room_id } => {
                let joined = gw.join_room(&client, &room_id).await?;
                self.start_forwarding(joined).await;
                return Ok(None);
            }
            InboundCommand::Leave { session_id } => {
                let handle = gw.leave(&client, &session_id).await?;
                if let Some(task) = self.forwarders.remove(&session_id) {
                    task.abort();
                }
                OutboundMessage::Left {
                    session_id: handle.session_id,
                    room_id: handle.room_id,
                }
            }
            InboundCommand::Say { session_id, text } => {
                // The sender receives its own message through the room fan-out.
                gw.say(&client, &session_id, &text).await?;
                return Ok(None);
            }
            InboundCommand::Move { user_id, position } => {
                let user_id = user_id.unwrap_or_else(|| client.user_id().clone());
                OutboundMessage::Presence {
                    record: gw.move_user(&client, &user_id, position)?,
                }
            }
            InboundCommand::EnterZone { zone_id } => OutboundMessage::Presence {
                record: gw.enter_zone(&client, zone_id)?,
            },
            InboundCommand::Heartbeat => OutboundMessage::Presence {
                record: gw.heartbeat(&client)?,
            },
            InboundCommand::SetStatus { status, message } => OutboundMessage::Presence {
                record: gw.set_status(&client, status, message)?,
            },
            InboundCommand::Snapshot { zone_id } => OutboundMessage::PresenceSnapshot {
                users: gw.presence_snapshot(zone_id.as_ref())?,
                zone_id,
            },
            InboundCommand::GetMessages { room_id, limit } => OutboundMessage::Messages {
                messages: gw.get_messages(&room_id, limit).await?,
                room_id,
            },
            InboundCommand::GetRoster { room_id } => OutboundMessage::Roster {
                roster: gw.get_roster(&room_id).await?,
                room_id,
            },
        };
        Ok(Some(reply))
    }

    /// Sends `joined`, then forwards the session's queued and future events.
    async fn start_forwarding(&mut self, joined: JoinedRoom) {
        let session_id = joined.handle.session_id;
        self.send(OutboundMessage::Joined {
            session: joined.handle,
        })
        .await;

        let task = tokio::spawn(forward_room_events(joined.events, self.outbound.clone()));
        if let Some(previous) = self.forwarders.insert(session_id, task) {
            previous.abort();
        }
        self.forwarders.retain(|_, task| !task.is_finished());
    }

    async fn send(&self, message: OutboundMessage) {
        if self.outbound.send(message).await.is_err() {
            debug!(conn_id = %self.client.id, "Outbound queue closed");
        }
    }
}

async fn forward_room_events(mut events: mpsc::Receiver<RoomEvent>, outbound: mpsc::Sender<OutboundMessage>) {
    while let Some(event) = events.recv().await {
        if outbound.send(event.into()).await.is_err() {
            break;
        }
    }
}

async fn forward_presence(
    mut events: broadcast::Receiver<crate::message::types::PresenceChanged>,
    outbound: mpsc::Sender<OutboundMessage>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if outbound
                    .send(OutboundMessage::PresenceChanged(event))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Presence stream lagged, diffs dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
