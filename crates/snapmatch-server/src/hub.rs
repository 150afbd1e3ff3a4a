//! WebSocket hub: bridges one socket to one room actor.
//!
//! Each connection runs in its own task with two halves glued by a
//! `select!`: room events flow out as JSON text frames, inbound frames
//! parse into client commands for the room. The task is also the
//! connection's janitor — when the socket drops for any reason, it
//! removes the player and tears the room down if nobody is left.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use snapmatch_protocol::{ClientMessage, RoomCode, ServerMessage};
use snapmatch_room::RoomHandle;

use crate::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let code = RoomCode::new(code);
    ws.on_upgrade(move |socket| handle_socket(socket, code, state))
}

async fn handle_socket(socket: WebSocket, code: RoomCode, state: Arc<AppState>) {
    let room = {
        let registry = state.registry.lock().await;
        registry.get(&code)
    };
    let (mut ws_tx, mut ws_rx) = socket.split();

    let room = match room {
        Ok(room) => room,
        Err(e) => {
            tracing::debug!(room = %code, error = %e, "connection to unknown room");
            reject(&mut ws_tx, e.to_string()).await;
            return;
        }
    };

    // Register with the room before reading any frames so join events
    // are already ordered ahead of anything this connection causes.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let joined = match room.join(event_tx).await {
        Ok(joined) => joined,
        Err(e) => {
            reject(&mut ws_tx, e.to_string()).await;
            return;
        }
    };
    let player_id = joined.player_id;
    tracing::debug!(room = %code, player = %player_id, "socket attached");

    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(msg) => {
                    let text = match serde_json::to_string(&msg) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!(room = %code, error = %e, "event serialization failed");
                            continue;
                        }
                    };
                    if ws_tx.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                // Room gone (actor stopped); drop the connection.
                None => break,
            },
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(msg) => {
                            if room.send(player_id, msg).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!(
                                room = %code,
                                player = %player_id,
                                error = %e,
                                "ignoring malformed frame"
                            );
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                // Pings are answered by axum; binary and pong are noise.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(room = %code, player = %player_id, error = %e, "socket error");
                    break;
                }
            },
        }
    }

    disconnect(&state, &room, &code, player_id).await;
}

/// Sends a protocol-level error and closes a socket that never joined.
async fn reject(ws_tx: &mut SplitSink<WebSocket, Message>, message: String) {
    let msg = ServerMessage::Error { message };
    if let Ok(text) = serde_json::to_string(&msg) {
        let _ = ws_tx.send(Message::Text(text)).await;
    }
    let _ = ws_tx.send(Message::Close(None)).await;
}

/// Removes the player from their room and retires the room if empty.
async fn disconnect(
    state: &AppState,
    room: &RoomHandle,
    code: &RoomCode,
    player_id: snapmatch_protocol::PlayerId,
) {
    tracing::debug!(room = %code, player = %player_id, "socket detached");
    match room.leave(player_id).await {
        Ok(0) => {
            let mut registry = state.registry.lock().await;
            registry.remove(code).await;
        }
        Ok(_) => {}
        // Actor already stopped; the registry entry may linger if the
        // room ended on its own, so sweep it here too.
        Err(_) => {
            let mut registry = state.registry.lock().await;
            registry.remove(code).await;
        }
    }
}
