//! # Actions
//!
//! Logical actions enqueued by external triggers (native callbacks, timers,
//! user taps) and by workflows handing off to each other.

use lumen_core::{NotificationRecord, UploadEvent};

#[derive(Debug, Clone)]
pub enum Action {
    /// Turn on native notification delivery.
    EnableNotifications,

    /// Mark every notification read on the node.
    MarkAllRead,

    /// A push notification arrived.
    InboundNotification(NotificationRecord),

    /// User tapped a native notification; raw payload from the OS.
    Engagement(serde_json::Value),

    /// User opened a notification (in-app or via engagement).
    ViewNotification(NotificationRecord),

    /// Periodic or manual refresh of the notification list.
    RefreshNotifications,

    /// Show and accept a thread invite.
    ReviewThreadInvite(NotificationRecord),

    /// User confirmed a pairing request for this key.
    PairDevice { public_key: String },

    /// A pairing deep link was opened.
    PairFromLink { link: String },

    /// Uploader callback or user upload action.
    Upload(UploadEvent),
}

impl Action {
    /// Short name used in logs and spans.
    pub fn name(&self) -> &'static str {
        match self {
            Action::EnableNotifications => "enable_notifications",
            Action::MarkAllRead => "mark_all_read",
            Action::InboundNotification(_) => "inbound_notification",
            Action::Engagement(_) => "engagement",
            Action::ViewNotification(_) => "view_notification",
            Action::RefreshNotifications => "refresh_notifications",
            Action::ReviewThreadInvite(_) => "review_thread_invite",
            Action::PairDevice { .. } => "pair_device",
            Action::PairFromLink { .. } => "pair_from_link",
            Action::Upload(_) => "upload",
        }
    }
}
