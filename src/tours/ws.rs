//! WebSocket endpoint bridging editing connections into the relay.
//!
//! The socket speaks JSON text frames. A client first sends `join-tour` for
//! the tour it is editing, then any number of `tour-update` frames; each
//! update's `data` is fanned out verbatim to the other members of that
//! room. Closing the socket is the implicit leave. There is no credential
//! check here: room access follows from being able to fetch the tour at
//! all, and the relay itself has no error channel.

use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::relay::{ConnId, Relay};

/// Frames accepted from editing clients.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    #[serde(rename_all = "camelCase")]
    JoinTour { tour_id: String },
    #[serde(rename_all = "camelCase")]
    TourUpdate { tour_id: String, data: Value },
}

/// Frames pushed to editing clients. The room id is implicit: a client
/// only ever receives updates for rooms it joined.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerFrame {
    TourUpdate { data: Value },
}

#[debug_handler(state = crate::AppState)]
pub async fn tour_ws(
    State(relay): State<Arc<Relay>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(socket: WebSocket, relay: Arc<Relay>) {
    let conn: ConnId = Uuid::now_v7();
    info!(%conn, "editing client connected");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();

    // Forward relayed payloads to this client.
    let send_task = tokio::spawn(async move {
        while let Some(data) = rx.recv().await {
            let frame = ServerFrame::TourUpdate { data };
            let Ok(json) = serde_json::to_string(&frame) else {
                continue;
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            continue;
        };

        let frame: ClientFrame = match serde_json::from_str(text.as_str()) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%conn, %err, "dropping unparseable frame");
                continue;
            }
        };

        match frame {
            ClientFrame::JoinTour { tour_id } => {
                relay.join(&tour_id, conn, tx.clone()).await;
            }
            ClientFrame::TourUpdate { tour_id, data } => {
                debug!(%conn, tour_id, "relaying update");
                relay.broadcast(&tour_id, conn, data).await;
            }
        }
    }

    relay.leave(conn).await;
    send_task.abort();
    info!(%conn, "editing client disconnected");
}
