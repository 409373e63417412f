//! # Workflows
//!
//! One workflow per external trigger. Each runs to completion with explicit
//! suspension points (fixed delays, the Online-Gate, awaited collaborator
//! calls) and never lets an error escape: failures become store events or
//! diagnostics.
//!
//! ## Workflow Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Action                    Workflow                    Stores touched   │
//! │  ────────────────────────  ──────────────────────────  ──────────────── │
//! │  EnableNotifications       enable_notifications        -                │
//! │  MarkAllRead               mark_all_read               notifications    │
//! │  InboundNotification       handle_inbound              -                │
//! │  Engagement                handle_engagement ──┐       -                │
//! │  ViewNotification          view_notification ◄─┘ ──┐   notifications    │
//! │  ReviewThreadInvite        review_thread_invite ◄──┘   -                │
//! │  RefreshNotifications      refresh_notifications       notifications    │
//! │  PairDevice / PairFromLink pair_device                 pairing          │
//! │  Upload(..)                handle_upload               uploads          │
//! │                                                                         │
//! │  ──┐ / ◄─┘ : hand-off through the action queue                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod notifications;
mod pairing;
mod uploads;

pub use notifications::RefreshOutcome;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::action::Action;
use crate::collaborators::Collaborators;
use crate::config::FlowConfig;
use crate::error::{FlowError, FlowResult};
use crate::gate::OnlineGate;
use crate::state::Stores;

/// Everything a workflow can touch.
pub struct Workflows {
    config: Arc<FlowConfig>,
    stores: Arc<Stores>,
    collaborators: Collaborators,
    gate: Arc<dyn OnlineGate>,
    /// Queue for hand-offs to other workflows.
    followups: mpsc::Sender<Action>,
}

impl Workflows {
    pub fn new(
        config: Arc<FlowConfig>,
        stores: Arc<Stores>,
        collaborators: Collaborators,
        gate: Arc<dyn OnlineGate>,
        followups: mpsc::Sender<Action>,
    ) -> Self {
        Workflows {
            config,
            stores,
            collaborators,
            gate,
            followups,
        }
    }

    pub fn stores(&self) -> &Arc<Stores> {
        &self.stores
    }

    /// Runs the workflow for one action to completion.
    pub async fn run(&self, action: Action) {
        let span = tracing::info_span!("workflow", action = action.name(), run_id = %Uuid::new_v4());

        async move {
            debug!("Workflow started");
            match action {
                Action::EnableNotifications => self.enable_notifications().await,
                Action::MarkAllRead => self.mark_all_read().await,
                Action::InboundNotification(record) => self.handle_inbound(record).await,
                Action::Engagement(payload) => self.handle_engagement(payload).await,
                Action::ViewNotification(record) => self.view_notification(record).await,
                Action::RefreshNotifications => {
                    self.refresh_notifications().await;
                }
                Action::ReviewThreadInvite(record) => self.review_thread_invite(record).await,
                Action::PairDevice { public_key } => self.pair_device(public_key).await,
                Action::PairFromLink { link } => self.pair_from_link(&link).await,
                Action::Upload(event) => self.handle_upload(event),
            }
            debug!("Workflow finished");
        }
        .instrument(span)
        .await
    }

    async fn enqueue(&self, action: Action) -> FlowResult<()> {
        self.followups
            .send(action)
            .await
            .map_err(|_| FlowError::ChannelError("Action queue closed".into()))
    }
}
