//! Notification workflows: enable, mark-all-read, inbound push, engagement,
//! view, refresh and invite review.

use tracing::{debug, info, warn};

use lumen_core::{NotificationEvent, NotificationKind, NotificationRecord, RawNotification};

use super::Workflows;
use crate::action::Action;
use crate::collaborators::{Route, NOTIFICATIONS_SERVICE};
use crate::error::{FlowError, FlowResult};

/// Diagnostics category for everything in this module.
const CATEGORY: &str = "Notifications";

/// How a refresh request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another refresh held the flag; nothing was touched.
    Skipped,
    /// Records replaced; carries how many.
    Refreshed(usize),
    Failed,
}

impl Workflows {
    pub async fn enable_notifications(&self) {
        if let Err(e) = self.collaborators.node.enable_notifications().await {
            warn!(error = %e, "Failed to enable notifications");
        }
    }

    /// Asks the node to mark everything read; mirrors it only on success.
    pub async fn mark_all_read(&self) {
        match self.collaborators.node.mark_all_read().await {
            Ok(()) => {
                self.stores.apply_notification(NotificationEvent::AllAcknowledged);
            }
            Err(e) => warn!(error = %e, "Failed to mark all notifications read"),
        }
    }

    // =========================================================================
    // Inbound push
    // =========================================================================

    /// Decides whether a pushed notification becomes a local alert.
    pub async fn handle_inbound(&self, record: NotificationRecord) {
        let diagnostics = &self.collaborators.diagnostics;
        diagnostics.log_event(CATEGORY, "new request", false);

        if let Err(e) = self.try_handle_inbound(&record).await {
            warn!(notification_id = %record.id, error = %e, "Inbound notification failed");
            diagnostics.log_event(CATEGORY, &e.to_string(), true);
        }
    }

    async fn try_handle_inbound(&self, record: &NotificationRecord) -> FlowResult<()> {
        if !self.service_enabled(NOTIFICATIONS_SERVICE).await? {
            debug!("Notifications disabled globally");
            return Ok(());
        }
        if !self.service_enabled(record.kind.as_str()).await? {
            debug!(kind = %record.kind, "Notifications disabled for kind");
            return Ok(());
        }

        self.collaborators
            .diagnostics
            .log_event(CATEGORY, "creating local", false);

        if self.collaborators.platform.should_display_alert() {
            self.collaborators.display.show_local_alert(record).await?;
            info!(notification_id = %record.id, "Local alert shown");
        } else {
            debug!(notification_id = %record.id, "App in foreground, alert suppressed");
        }
        Ok(())
    }

    async fn service_enabled(&self, key: &str) -> FlowResult<bool> {
        let status = self.collaborators.preferences.service_status(key).await?;
        Ok(status.map_or(false, |s| s.status))
    }

    // =========================================================================
    // Engagement
    // =========================================================================

    /// Tap on a native notification. Best effort: bad payloads are dropped
    /// without a trace in diagnostics.
    pub async fn handle_engagement(&self, payload: serde_json::Value) {
        let record = match parse_engagement(&payload) {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(e) => {
                debug!(error = %e, "Dropping engagement payload");
                return;
            }
        };

        tokio::time::sleep(self.config.notifications.engagement_debounce()).await;
        let _ = self.enqueue(Action::ViewNotification(record)).await;
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Opens a notification. Any failure leaves an error badge on the record.
    pub async fn view_notification(&self, record: NotificationRecord) {
        if let Err(e) = self.try_view(&record).await {
            if e.is_channel_closed() {
                debug!(notification_id = %record.id, "Action queue closed; invite review dropped");
                return;
            }
            warn!(notification_id = %record.id, error = %e, "Viewing notification failed");
            self.stores
                .apply_notification(NotificationEvent::ViewFailed { id: record.id });
        }
    }

    async fn try_view(&self, record: &NotificationRecord) -> FlowResult<()> {
        self.collaborators.node.mark_read(&record.id).await?;
        self.stores.apply_notification(NotificationEvent::Acknowledged {
            id: record.id.clone(),
        });

        let navigator = &self.collaborators.navigator;
        match record.kind {
            kind if kind.targets_content() => {
                if let Some(thread) = self.resolve_thread(record) {
                    navigator.set_active_thread(&thread.id)?;
                    navigator.set_active_target(record.target.as_deref())?;
                    navigator.navigate(&Route::Photo)?;
                }
            }
            kind if kind.targets_membership() => {
                if let Some(thread) = self.resolve_thread(record) {
                    navigator.set_active_thread(&thread.id)?;
                    navigator.navigate(&Route::ViewThread {
                        thread_id: thread.id,
                    })?;
                }
            }
            NotificationKind::InviteReceived => {
                let timeout = self.config.gate.invite_timeout();
                let online = self.gate.wait_until_online(timeout).await;
                if self.config.gate.on_timeout.should_abort(online) {
                    return Err(FlowError::Offline(timeout.as_millis() as u64));
                }
                self.enqueue(Action::ReviewThreadInvite(record.clone())).await?;
            }
            _ => {}
        }
        Ok(())
    }

    fn resolve_thread(&self, record: &NotificationRecord) -> Option<lumen_core::ThreadData> {
        let thread = record
            .thread_id
            .as_deref()
            .and_then(|id| self.collaborators.threads.thread_data(id));
        if thread.is_none() {
            debug!(notification_id = %record.id, thread_id = ?record.thread_id, "Thread not found, staying put");
        }
        thread
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Replaces the mirrored list with the node's newest page.
    ///
    /// At most one refresh runs at a time: the flag is claimed with a single
    /// check-and-set before the first suspension point, and released on
    /// every exit path.
    pub async fn refresh_notifications(&self) -> RefreshOutcome {
        if !self.stores.try_begin_refresh() {
            debug!("Refresh already in flight, dropping request");
            return RefreshOutcome::Skipped;
        }

        match self.fetch_notifications().await {
            Ok(records) => {
                let count = records.len();
                self.stores
                    .apply_notification(NotificationEvent::RefreshSucceeded { records });
                info!(count, "Notifications refreshed");
                RefreshOutcome::Refreshed(count)
            }
            Err(e) => {
                warn!(error = %e, "Notification refresh failed");
                self.stores.apply_notification(NotificationEvent::RefreshFailed);
                RefreshOutcome::Failed
            }
        }
    }

    async fn fetch_notifications(&self) -> FlowResult<Vec<NotificationRecord>> {
        let timeout = self.config.gate.refresh_timeout();
        let online = self.gate.wait_until_online(timeout).await;
        if self.config.gate.on_timeout.should_abort(online) {
            return Err(FlowError::Offline(timeout.as_millis() as u64));
        }

        let settings = &self.config.notifications;
        let raw = self
            .collaborators
            .node
            .list_notifications(&settings.page_offset, settings.page_size)
            .await?;

        raw.into_iter()
            .map(RawNotification::into_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(FlowError::from)
    }

    // =========================================================================
    // Invite review
    // =========================================================================

    /// Shows the invite alert and accepts the invite. Failures mean the
    /// invite is ignored.
    pub async fn review_thread_invite(&self, record: NotificationRecord) {
        if let Err(e) = self.try_review_invite(&record).await {
            debug!(notification_id = %record.id, error = %e, "Ignoring invite");
        }
    }

    async fn try_review_invite(&self, record: &NotificationRecord) -> FlowResult<()> {
        let Some(payload) = record.invite_payload() else {
            return Ok(());
        };
        let accepted = self
            .collaborators
            .display
            .show_invite_alert(&payload.message)
            .await?;
        if !accepted {
            return Ok(());
        }

        // invite_payload() only exists when the thread name does.
        let thread_name = record.thread_name.as_deref().unwrap_or_default();
        self.collaborators
            .node
            .accept_thread_invite(&record.id, thread_name)
            .await?;
        info!(notification_id = %record.id, thread_name, "Thread invite accepted");
        Ok(())
    }
}

/// Pulls the record out of an engagement payload. A payload without a
/// `notification` field is not an error.
fn parse_engagement(payload: &serde_json::Value) -> FlowResult<Option<NotificationRecord>> {
    let Some(raw) = payload.get("notification") else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_value(raw.clone())?))
}
