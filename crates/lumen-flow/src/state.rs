//! # Shared Stores
//!
//! The three lumen-core stores behind locks, shared by every workflow.
//!
//! Store transitions are synchronous and never held across an `.await`,
//! so plain `std::sync::RwLock` is enough. Every transition that changes a
//! store bumps a revision on a `watch` channel so the UI can re-render.

use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use tokio::sync::watch;
use tracing::warn;

use lumen_core::{
    Applied, NotificationEvent, NotificationStore, PairingEvent, PairingStore, UploadEvent,
    UploadStore,
};

/// Owned copy of all three stores at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub uploads: UploadStore,
    pub pairing: PairingStore,
    pub notifications: NotificationStore,
    pub revision: u64,
}

pub struct Stores {
    uploads: RwLock<UploadStore>,
    pairing: RwLock<PairingStore>,
    notifications: RwLock<NotificationStore>,
    revision: watch::Sender<u64>,
}

impl Default for Stores {
    fn default() -> Self {
        Self::new()
    }
}

impl Stores {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Stores {
            uploads: RwLock::new(UploadStore::default()),
            pairing: RwLock::new(PairingStore::default()),
            notifications: RwLock::new(NotificationStore::default()),
            revision,
        }
    }

    /// Receiver that changes whenever any store changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn uploads<R>(&self, f: impl FnOnce(&UploadStore) -> R) -> R {
        f(&self.uploads.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn pairing<R>(&self, f: impl FnOnce(&PairingStore) -> R) -> R {
        f(&self.pairing.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn notifications<R>(&self, f: impl FnOnce(&NotificationStore) -> R) -> R {
        f(&self.notifications.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            uploads: self.uploads(Clone::clone),
            pairing: self.pairing(Clone::clone),
            notifications: self.notifications(Clone::clone),
            revision: self.revision(),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    pub fn apply_upload(&self, event: UploadEvent) -> Applied {
        let applied = self
            .uploads
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(event);
        self.settle("uploads", applied)
    }

    pub fn apply_pairing(&self, event: PairingEvent) -> Applied {
        let applied = self
            .pairing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(event);
        self.settle("pairing", applied)
    }

    pub fn apply_notification(&self, event: NotificationEvent) -> Applied {
        let applied = self
            .notifications
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(event);
        self.settle("notifications", applied)
    }

    /// Check-and-set of the refreshing flag under a single write lock.
    pub fn try_begin_refresh(&self) -> bool {
        let claimed = self
            .notifications
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .try_begin_refresh();
        if claimed {
            self.bump();
        }
        claimed
    }

    fn settle(&self, store: &'static str, applied: Applied) -> Applied {
        match applied {
            Applied::Changed => self.bump(),
            Applied::Ignored => warn!(store, "Stale update ignored: no record matched"),
        }
        applied
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}
