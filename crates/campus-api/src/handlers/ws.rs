//! WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use campus_entity::user::UserHandle;
use campus_realtime::ConnectionDriver;
use campus_realtime::message::types::OutboundMessage;

use crate::extractors::ClientIdentity;
use crate::state::AppState;

/// GET /ws?user_id=&display_name=&role=&avatar_url=
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ClientIdentity(user): ClientIdentity,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, user, socket))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, user: UserHandle, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let buffer = state.config.realtime.session_buffer_size;

    let (mut driver, mut outbound_rx) =
        match ConnectionDriver::start(state.engine.gateway.clone(), user.clone(), buffer).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(user_id = %user.user_id, error = %e, "WebSocket connection refused");
                if let Ok(text) = serde_json::to_string(&OutboundMessage::from(&e)) {
                    let _ = ws_tx.send(Message::Text(text.into())).await;
                }
                let _ = ws_tx.send(Message::Close(None)).await;
                return;
            }
        };

    let conn_id = driver.client().id;
    info!(conn_id = %conn_id, user_id = %user.user_id, "WebSocket connection established");

    // Outbound forwarder
    let outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "Failed to encode frame");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => driver.handle_text(text.as_str()).await,
            Ok(Message::Close(_)) => break,
            // Ping/pong is answered by axum; binary frames are not part of the protocol.
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    driver.close().await;

    info!(conn_id = %conn_id, user_id = %user.user_id, "WebSocket connection closed");
}
