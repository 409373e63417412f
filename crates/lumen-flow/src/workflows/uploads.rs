//! Uploader callbacks routed into the upload store.

use tracing::{debug, info, warn};

use lumen_core::{UploadEvent, UploadState};

use super::Workflows;

impl Workflows {
    /// Applies an uploader event, guarding retries against the attempt
    /// budget.
    pub fn handle_upload(&self, event: UploadEvent) {
        match &event {
            UploadEvent::RetryRequested { content_hash } => {
                let retryable = self
                    .stores
                    .uploads(|s| s.get(content_hash).map(|item| item.can_retry()));
                match retryable {
                    Some(true) => info!(content_hash = %content_hash, "Retrying upload"),
                    Some(false) => {
                        warn!(content_hash = %content_hash, "Retry refused: item not failed or out of attempts");
                        return;
                    }
                    // Unknown hash: let the store count it as stale.
                    None => {}
                }
            }
            UploadEvent::Failed {
                content_hash,
                error,
            } => {
                let exhausted = self.stores.uploads(|s| {
                    s.get(content_hash)
                        .map_or(false, |item| item.remaining_attempts == 0)
                });
                if exhausted {
                    warn!(content_hash = %content_hash, error = %error, "Upload failed with no attempts left");
                } else {
                    info!(content_hash = %content_hash, error = %error, "Upload failed");
                }
            }
            UploadEvent::Completed { content_hash } => {
                info!(content_hash = %content_hash, "Upload complete");
            }
            UploadEvent::Progress {
                content_hash,
                raw_progress,
            } => {
                debug!(content_hash = %content_hash, raw_progress, "Upload progress");
            }
            _ => debug!(?event, "Upload event"),
        }

        self.stores.apply_upload(event);
    }

    /// Current state of an upload, if tracked.
    pub fn upload_state(&self, content_hash: &str) -> Option<UploadState> {
        self.stores
            .uploads(|s| s.get(content_hash).map(|item| item.state))
    }
}
