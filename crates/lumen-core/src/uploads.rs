//! # Item Lifecycle Store
//!
//! Retry/progress state of outbound uploads, plus the processing status of
//! local media URIs that feed them.
//!
//! ## Upload Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Upload Item States                                │
//! │                                                                         │
//! │   Queued ──► ┌─────────┐  Progress  ┌────────────┐  Completed          │
//! │              │ Pending │ ─────────► │ Processing │ ──────────► Complete │
//! │              └────▲────┘            └─────┬──────┘                      │
//! │                   │                       │ Failed                      │
//! │                   │ RetryRequested        ▼                             │
//! │                   │ (user)          ┌──────────┐                        │
//! │                   └──────────────── │  Error   │  remaining_attempts -1 │
//! │                                     └──────────┘                        │
//! │                                                                         │
//! │   Removed: entry deleted once the node confirms removal                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition is an O(n) scan keyed by `content_hash`. Unmatched
//! hashes are ignored and counted in [`UploadStore::stale_updates`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{MediaStatus, UploadItem, UploadState};
use crate::Applied;

// =============================================================================
// Events
// =============================================================================

/// Events accepted by the Item Lifecycle Store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UploadEvent {
    /// A local file was queued for upload. Inserted at the front.
    Queued {
        uri: String,
        thread_id: String,
        content_hash: String,
        remote_payload_path: String,
    },

    /// User asked to retry a failed upload.
    RetryRequested { content_hash: String },

    /// Uploader progress callback, `raw_progress` in 0–100.
    Progress { content_hash: String, raw_progress: f64 },

    Completed { content_hash: String },

    Failed { content_hash: String, error: String },

    /// Node confirmed the item was removed.
    Removed { content_hash: String },

    /// Camera-roll URIs entered processing.
    PhotosProcessing { uris: Vec<String> },

    /// Processing a camera-roll URI failed.
    PhotoProcessingFailed { uri: String, error: String },

    /// URIs that should be skipped by the camera-roll scan.
    UrisIgnored { uris: Vec<String> },
}

impl UploadEvent {
    /// Shorthand for [`UploadEvent::Queued`].
    pub fn queued(
        uri: impl Into<String>,
        thread_id: impl Into<String>,
        content_hash: impl Into<String>,
        remote_payload_path: impl Into<String>,
    ) -> Self {
        UploadEvent::Queued {
            uri: uri.into(),
            thread_id: thread_id.into(),
            content_hash: content_hash.into(),
            remote_payload_path: remote_payload_path.into(),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Collection of upload items, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadStore {
    items: Vec<UploadItem>,

    /// Local URI → processing status.
    media: HashMap<String, MediaStatus>,

    #[serde(skip)]
    stale_updates: u64,
}

impl UploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items, newest first.
    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    /// First item with the given hash.
    pub fn get(&self, content_hash: &str) -> Option<&UploadItem> {
        self.items.iter().find(|i| i.content_hash == content_hash)
    }

    /// Processing status of a local URI.
    pub fn media_status(&self, uri: &str) -> Option<MediaStatus> {
        self.media.get(uri).copied()
    }

    /// Number of events that matched no item since the store was created.
    pub fn stale_updates(&self) -> u64 {
        self.stale_updates
    }

    /// Applies one event.
    ///
    /// Never fails. Events naming an unknown hash leave the items untouched
    /// and return [`Applied::Ignored`].
    pub fn apply(&mut self, event: UploadEvent) -> Applied {
        let applied = match event {
            UploadEvent::Queued {
                uri,
                thread_id,
                content_hash,
                remote_payload_path,
            } => {
                // Duplicate hashes are the caller's problem.
                self.media.insert(uri.clone(), MediaStatus::Complete);
                let item = UploadItem::new(uri, thread_id, content_hash, remote_payload_path);
                self.items.insert(0, item);
                Applied::Changed
            }

            UploadEvent::RetryRequested { content_hash } => {
                self.update(&content_hash, |item| item.state = UploadState::Pending)
            }

            UploadEvent::Progress {
                content_hash,
                raw_progress,
            } => {
                // Uploaders report 0-100; anything else is pinned to the ends.
                let fraction = if raw_progress.is_nan() {
                    0.0
                } else {
                    (raw_progress / 100.0).clamp(0.0, 1.0)
                };
                self.update(&content_hash, |item| {
                    item.state = UploadState::Processing;
                    item.progress = fraction;
                })
            }

            UploadEvent::Completed { content_hash } => {
                self.update(&content_hash, |item| item.state = UploadState::Complete)
            }

            UploadEvent::Failed {
                content_hash,
                error,
            } => self.update(&content_hash, |item| {
                item.state = UploadState::Error;
                item.last_error = Some(error.clone());
                item.remaining_attempts = item.remaining_attempts.saturating_sub(1);
            }),

            UploadEvent::Removed { content_hash } => {
                let before = self.items.len();
                self.items.retain(|i| i.content_hash != content_hash);
                Applied::from_matches(before - self.items.len())
            }

            UploadEvent::PhotosProcessing { uris } => {
                self.mark_media(uris, MediaStatus::Processing)
            }

            UploadEvent::PhotoProcessingFailed { uri, .. } => {
                self.mark_media(vec![uri], MediaStatus::Error)
            }

            UploadEvent::UrisIgnored { uris } => self.mark_media(uris, MediaStatus::Complete),
        };

        if applied == Applied::Ignored {
            self.stale_updates += 1;
        }
        applied
    }

    /// Consuming form of [`UploadStore::apply`] for fold-style callers.
    pub fn reduce(mut self, event: UploadEvent) -> Self {
        self.apply(event);
        self
    }

    fn update(&mut self, content_hash: &str, mut f: impl FnMut(&mut UploadItem)) -> Applied {
        let mut matched = 0;
        for item in self.items.iter_mut().filter(|i| i.content_hash == content_hash) {
            f(item);
            matched += 1;
        }
        Applied::from_matches(matched)
    }

    fn mark_media(&mut self, uris: Vec<String>, status: MediaStatus) -> Applied {
        if uris.is_empty() {
            return Applied::Ignored;
        }
        for uri in uris {
            self.media.insert(uri, status);
        }
        Applied::Changed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
