//! WebSocket transport for an editing session.
//!
//! Bridges the session's channels onto the relay endpoint: outbound updates
//! become `tour-update` frames, inbound `tour-update` frames are decoded
//! and queued for the session. Both pumps stop quietly when the connection
//! drops; live sync simply ends while the session keeps working locally,
//! and no error is surfaced past the initial connect.

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

use crate::tours::model::TourUpdate;

use super::api::ClientError;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum OutboundFrame<'a> {
    #[serde(rename_all = "camelCase")]
    JoinTour { tour_id: &'a str },
    #[serde(rename_all = "camelCase")]
    TourUpdate { tour_id: &'a str, data: &'a TourUpdate },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum InboundFrame {
    TourUpdate { data: TourUpdate },
}

/// Connect to the relay, join the room for `tour_id`, and spawn the two
/// pump tasks. Returns the inbound update stream for the session to drain.
pub async fn connect(
    relay_url: &str,
    tour_id: &str,
    mut outbound: mpsc::UnboundedReceiver<TourUpdate>,
) -> Result<mpsc::UnboundedReceiver<TourUpdate>, ClientError> {
    let (ws_stream, _response) = connect_async(relay_url).await?;
    let (mut sink, mut stream) = ws_stream.split();

    let join = serde_json::to_string(&OutboundFrame::JoinTour { tour_id })?;
    sink.send(Message::Text(join)).await?;

    let tour_id = tour_id.to_owned();
    tokio::spawn(async move {
        while let Some(update) = outbound.recv().await {
            let frame = OutboundFrame::TourUpdate { tour_id: &tour_id, data: &update };
            let Ok(json) = serde_json::to_string(&frame) else {
                continue;
            };
            if sink.send(Message::Text(json)).await.is_err() {
                debug!("relay connection closed, publishes stop");
                break;
            }
        }
    });

    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(msg) = stream.next().await {
            let text = match msg {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => continue,
            };

            match serde_json::from_str::<InboundFrame>(&text) {
                Ok(InboundFrame::TourUpdate { data }) => {
                    if inbound_tx.send(data).is_err() {
                        break;
                    }
                }
                // Peers can relay anything; unrecognized shapes are dropped
                // here so the session only ever sees update payloads.
                Err(err) => warn!(%err, "ignoring unrecognized frame"),
            }
        }
        debug!("relay stream ended");
    });

    Ok(inbound_rx)
}
