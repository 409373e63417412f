//! # Notification Store
//!
//! Mirrors the node's notification list and owns the process-wide
//! `refreshing` flag.
//!
//! ## Refresh Flag Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   refreshing=false ── RefreshStarted ──► refreshing=true                │
//! │                                             │                           │
//! │                      RefreshSucceeded(recs) │ RefreshFailed             │
//! │                      records := recs        │ records untouched         │
//! │                                             ▼                           │
//! │                                       refreshing=false                  │
//! │                                                                         │
//! │  Only the refresh workflow writes the flag. `try_begin_refresh` checks │
//! │  and sets it in one step so two refreshes can never both start.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::types::NotificationRecord;
use crate::Applied;

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// Caller guarantees `refreshing` was false.
    RefreshStarted,

    /// Replaces the records wholesale and clears `refreshing`.
    RefreshSucceeded { records: Vec<NotificationRecord> },

    /// Clears `refreshing`, keeps the records.
    RefreshFailed,

    /// The node acknowledged the read; mirror it locally.
    Acknowledged { id: String },

    /// The node acknowledged a mark-all-read.
    AllAcknowledged,

    /// Viewing the notification failed; show an error badge.
    ViewFailed { id: String },
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationStore {
    refreshing: bool,
    records: Vec<NotificationRecord>,

    #[serde(skip)]
    stale_updates: u64,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&NotificationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|r| !r.read).count()
    }

    pub fn stale_updates(&self) -> u64 {
        self.stale_updates
    }

    /// Claims the refresh slot.
    ///
    /// Returns false (and changes nothing) if a refresh is already running,
    /// otherwise applies [`NotificationEvent::RefreshStarted`].
    pub fn try_begin_refresh(&mut self) -> bool {
        if self.refreshing {
            return false;
        }
        self.apply(NotificationEvent::RefreshStarted);
        true
    }

    pub fn apply(&mut self, event: NotificationEvent) -> Applied {
        let applied = match event {
            NotificationEvent::RefreshStarted => {
                self.refreshing = true;
                Applied::Changed
            }
            NotificationEvent::RefreshSucceeded { records } => {
                self.records = records;
                self.refreshing = false;
                Applied::Changed
            }
            NotificationEvent::RefreshFailed => {
                self.refreshing = false;
                Applied::Changed
            }
            NotificationEvent::Acknowledged { id } => self.update(&id, |r| r.read = true),
            NotificationEvent::AllAcknowledged => {
                self.records.iter_mut().for_each(|r| r.read = true);
                Applied::Changed
            }
            NotificationEvent::ViewFailed { id } => self.update(&id, |r| r.view_failed = true),
        };

        if applied == Applied::Ignored {
            self.stale_updates += 1;
        }
        applied
    }

    pub fn reduce(mut self, event: NotificationEvent) -> Self {
        self.apply(event);
        self
    }

    fn update(&mut self, id: &str, f: impl Fn(&mut NotificationRecord)) -> Applied {
        let mut matched = 0;
        for record in self.records.iter_mut().filter(|r| r.id == id) {
            f(record);
            matched += 1;
        }
        Applied::from_matches(matched)
    }
}
