//! WebSocket bridge
//!
//! Upgrades `GET /ws` and forwards every bus message to the socket as a
//! JSON text frame. Inbound frames are ignored apart from close; the
//! channel is one-way, server to client.

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use tokio::sync::broadcast::error::RecvError;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws", get(ws_handler))
}

async fn ws_handler(State(state): State<ServerState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| client_loop(socket, state))
}

/// Per-client forward loop
///
/// A lagged receiver skips to the newest message: live updates are
/// best-effort and clients re-fetch on reconnect anyway.
async fn client_loop(mut socket: WebSocket, state: ServerState) {
    let bus = state.bus.clone();
    let mut rx = bus.subscribe();
    let shutdown = bus.shutdown_token().clone();

    tracing::debug!(subscribers = bus.subscriber_count(), "WebSocket client connected");

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Ok(msg) => {
                    let Ok(text) = serde_json::to_string(&msg) else {
                        continue;
                    };
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "WebSocket client lagged, skipping messages");
                }
                Err(RecvError::Closed) => break,
            },
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // pings handled by axum, other frames ignored
                Some(Err(_)) => break,
            },
            _ = shutdown.cancelled() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        }
    }

    tracing::debug!("WebSocket client disconnected");
}
