//! One live editing session: optimistic local mutation, fire-and-forget
//! publish, and last-write-observed-wins merge of inbound updates.

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::tours::model::{Step, Tour, TourUpdate};

use super::{
    api::{ClientError, TourApi},
    draft::Draft,
};

/// Lifecycle of one mounted editing view.
///
/// `Loading` and `Error` are the before/failure states of
/// [`open`](super::open): while the persisted tour is being fetched the
/// session does not exist yet, and a failed fetch never constructs one (no
/// draft, no room membership; the caller surfaces the error and may remount
/// to retry). A constructed session is always `Syncing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Syncing,
    Error,
}

#[derive(Debug)]
pub struct EditingSession {
    tour_id: Uuid,
    draft: Draft,
    phase: SessionPhase,
    outbound: mpsc::UnboundedSender<TourUpdate>,
    /// Armed right before each publish so the next inbound payload, which
    /// may be our own update echoed back, is swallowed exactly once. A
    /// heuristic, not a guarantee: two back-to-back publishes arm it only
    /// once, so only the first following inbound payload is suppressed.
    suppress_echo: bool,
}

impl EditingSession {
    /// Start a session from a freshly fetched tour. `outbound` carries
    /// fire-and-forget publishes toward the relay; the view layer must
    /// never wait on their delivery.
    pub fn begin(tour: &Tour, outbound: mpsc::UnboundedSender<TourUpdate>) -> Self {
        Self {
            tour_id: tour.id,
            draft: Draft::new(tour.title.clone(), tour.steps.clone()),
            phase: SessionPhase::Syncing,
            outbound,
            suppress_echo: false,
        }
    }

    pub fn tour_id(&self) -> Uuid {
        self.tour_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Replace the draft title and publish the whole new value.
    pub fn edit_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.publish(TourUpdate::title(self.draft.title.clone()));
    }

    pub fn edit_step_media(&mut self, index: usize, media_uri: impl Into<String>) {
        let Some(step) = self.draft.steps.get_mut(index) else {
            return;
        };
        step.media_uri = media_uri.into();
        self.publish_steps();
    }

    pub fn edit_step_description(&mut self, index: usize, description: impl Into<String>) {
        let Some(step) = self.draft.steps.get_mut(index) else {
            return;
        };
        step.description = description.into();
        self.publish_steps();
    }

    /// Append a blank step, to be filled in by subsequent edits.
    pub fn add_step(&mut self) {
        self.draft.steps.push(Step { media_uri: String::new(), description: String::new() });
        self.publish_steps();
    }

    pub fn remove_step(&mut self, index: usize) {
        if self.draft.remove_step(index) {
            self.publish_steps();
        }
    }

    /// Drag-reorder: extraction and reinsertion in one synchronous
    /// mutation, then publish of the resulting full sequence. A drag
    /// without a resolved destination is the caller's no-op; out-of-bounds
    /// indices change nothing and publish nothing.
    pub fn move_step(&mut self, src: usize, dst: usize) {
        if self.draft.move_step(src, dst) {
            self.publish_steps();
        }
    }

    /// Merge one inbound relay payload into the draft: whole-field
    /// overwrite, most recently received wins. The first payload after a
    /// publish is treated as a self-echo and dropped.
    pub fn handle_inbound(&mut self, update: TourUpdate) {
        let suppressed = self.suppress_echo;
        self.suppress_echo = false;
        if suppressed {
            debug!(tour_id = %self.tour_id, "swallowing presumed self-echo");
            return;
        }
        self.draft.apply_remote(update);
    }

    /// Push the complete current draft to persistence. This touches no
    /// relay state. On failure the draft is untouched and the session
    /// stays usable, so the caller can surface the error and retry.
    pub async fn save(&self, api: &TourApi) -> Result<Tour, ClientError> {
        api.update_tour(
            self.tour_id,
            Some(self.draft.title.clone()),
            Some(self.draft.steps.clone()),
            None,
        )
        .await
    }

    fn publish_steps(&mut self) {
        let steps = self.draft.steps.clone();
        self.publish(TourUpdate::steps(steps));
    }

    fn publish(&mut self, update: TourUpdate) {
        self.suppress_echo = true;
        // Fire and forget: a closed transport just means live sync has
        // stopped, while the draft stays fully usable and savable.
        let _ = self.outbound.send(update);
    }
}
