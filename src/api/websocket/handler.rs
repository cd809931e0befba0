//! WebSocket connection handler

use std::sync::Arc;
use axum::{
    extract::{ws::{Message, WebSocket, WebSocketUpgrade}, State},
    response::Response,
};
use futures::{SinkExt, StreamExt};

use crate::router::Hub;
use crate::types::{ClientChannel, ClientId};
use super::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one connection until either side closes
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();
    let (channel, mut outbound) = ClientChannel::with_capacity(state.queue_capacity);
    let id = state.hub.connect(channel);

    // Writer: everything the hub queues for this client, until the queue
    // overflows or the socket fails
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if sink.send(Message::Text(text)).await.is_err() {
                return; // Client disconnected
            }
        }
        tracing::info!(client = %id, "closing stalled or released connection");
        let _ = sink.send(Message::Close(None)).await;
    });

    let reader_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(msg) => {
                    if !handle_client_message(&reader_state.hub, id, msg) {
                        break; // Client requested close
                    }
                }
                Err(e) => {
                    tracing::debug!(client = %id, error = %e, "websocket error");
                    break;
                }
            }
        }
    });

    // A dead writer means frames can no longer be delivered; treat it as a close
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.hub.disconnect(id);
}

/// Handle a message from the client
/// Returns false if the connection should be closed
fn handle_client_message(hub: &Hub, id: ClientId, msg: Message) -> bool {
    match msg {
        Message::Text(text) => {
            hub.handle_text(id, &text);
            true
        }
        Message::Binary(_) => true, // Ignore binary messages
        // Pongs to pings are written by the websocket layer itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => false, // Client requested close
    }
}
