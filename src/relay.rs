//! Room-based fan-out for collaborative tour editing.
//!
//! Each tour being edited maps to one room, keyed by an opaque string (in
//! practice the tour id). The relay forwards update payloads between room
//! members verbatim; it never inspects, merges, or stores them. Delivery is
//! best effort with no acknowledgment and no history replay: a connection
//! that joins late sees nothing published before it joined and must seed
//! itself from the persisted tour.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

/// Handle identifying one live connection.
pub type ConnId = Uuid;

/// Sender half used to push relayed payloads to one connection.
pub type PayloadSender = mpsc::UnboundedSender<Value>;

/// The routing table. Membership is the only shared mutable state on the
/// server side; the lock makes join/leave atomic with respect to fan-out,
/// so a joiner is either in or out of any given broadcast, never half-in.
#[derive(Default)]
pub struct Relay {
    rooms: RwLock<HashMap<String, HashMap<ConnId, PayloadSender>>>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `conn` to the membership of `room`, creating the room entry if
    /// absent. Joining a room the connection is already in just replaces
    /// its sender.
    pub async fn join(&self, room: &str, conn: ConnId, sender: PayloadSender) {
        let mut rooms = self.rooms.write().await;
        rooms.entry(room.to_owned()).or_default().insert(conn, sender);
        debug!(%conn, room, "joined room");
    }

    /// Forward `payload` to every member of `room` except `sender`.
    ///
    /// A room with no other members is a no-op. Members whose channels are
    /// closed are skipped; their membership goes away when their connection
    /// task calls [`Relay::leave`].
    pub async fn broadcast(&self, room: &str, sender: ConnId, payload: Value) {
        let rooms = self.rooms.read().await;
        let Some(members) = rooms.get(room) else {
            return;
        };

        for (conn, tx) in members {
            if *conn == sender {
                continue;
            }
            let _ = tx.send(payload.clone());
        }
    }

    /// Drop `conn` from every room it belongs to, pruning rooms that become
    /// empty. Idempotent; safe for connections that never joined.
    pub async fn leave(&self, conn: ConnId) {
        let mut rooms = self.rooms.write().await;
        rooms.retain(|room, members| {
            if members.remove(&conn).is_some() {
                debug!(%conn, room, "left room");
            }
            !members.is_empty()
        });
    }

    /// Number of connections currently in `room`.
    pub async fn room_size(&self, room: &str) -> usize {
        self.rooms.read().await.get(room).map_or(0, HashMap::len)
    }
}
