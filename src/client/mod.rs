//! The editing-session client: the library equivalent of one browser
//! editing tab.
//!
//! It holds the authoritative in-memory draft for one tour, mutates it
//! synchronously on local actions, publishes each mutation to the relay as
//! a whole-field replacement, merges inbound updates last-write-observed-
//! wins, and persists only on an explicit save. The relay and persistence
//! paths are independent: losing one never affects the other.

pub mod api;
pub mod draft;
pub mod session;
pub mod ws;

pub use api::{ClientError, TourApi};
pub use draft::Draft;
pub use session::{EditingSession, SessionPhase};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::tours::model::TourUpdate;

/// Mount an editing view: fetch the persisted tour (the `Loading` phase),
/// then join the relay room and hand back the session in `Syncing` along
/// with its inbound update stream.
///
/// A fetch failure is terminal for this mount: no draft exists, no room is
/// joined, and the caller retries by calling `open` again.
pub async fn open(
    api: &TourApi,
    relay_url: &str,
    tour_id: Uuid,
) -> Result<(EditingSession, mpsc::UnboundedReceiver<TourUpdate>), ClientError> {
    let tour = api.fetch_tour(tour_id).await?;

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let inbound = ws::connect(relay_url, &tour.id.to_string(), outbound_rx).await?;

    Ok((EditingSession::begin(&tour, outbound_tx), inbound))
}
