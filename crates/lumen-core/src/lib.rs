//! # lumen-core: Pure State for the Lumen Client
//!
//! This crate holds the three stores of the event-orchestration layer and
//! the records they own. Every transition is a synchronous function of
//! (current state, event); nothing here sleeps, polls or talks to the node.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lumen Client Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             UI (TypeScript, renders store snapshots)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ actions                                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           lumen-flow (workflows, Online-Gate, queue)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ events                                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lumen-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────────┐  ┌────────┐  │   │
//! │  │   │  uploads  │  │  pairing  │  │ notifications │  │ types  │  │   │
//! │  │   │UploadStore│  │PairingStr.│  │ Notification  │  │records │  │   │
//! │  │   │           │  │PairingLink│  │    Store      │  │        │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────────┘  └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE TRANSITIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records shared with the UI (UploadItem, PairingRequest, ...)
//! - [`uploads`] - Item Lifecycle Store
//! - [`pairing`] - Pairing Store and pairing link parsing
//! - [`notifications`] - Notification Store and raw record mapping
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use lumen_core::uploads::{UploadEvent, UploadStore};
//! use lumen_core::UploadState;
//!
//! let mut store = UploadStore::default();
//! store.apply(UploadEvent::queued("file:///a.jpg", "thread-1", "abc", "/remote/abc"));
//! store.apply(UploadEvent::Progress { content_hash: "abc".into(), raw_progress: 50.0 });
//!
//! let item = store.get("abc").unwrap();
//! assert_eq!(item.state, UploadState::Processing);
//! assert_eq!(item.progress, 0.5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod notifications;
pub mod pairing;
pub mod types;
pub mod uploads;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use notifications::{NotificationEvent, NotificationStore};
pub use pairing::{PairingEvent, PairingLink, PairingStore};
pub use types::*;
pub use uploads::{UploadEvent, UploadStore};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Upload attempts granted to a freshly queued item.
pub const DEFAULT_UPLOAD_ATTEMPTS: u32 = 3;

/// Pairing code shown when a pairing link carries none.
pub const DEFAULT_PAIRING_CODE: &str = "WARN";

/// Outcome of applying one event to a store.
///
/// Unmatched identifiers are ignored by every store; `Ignored` lets callers
/// and tests tell a stale update apart from a real transition without the
/// store behaving any differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// At least one record changed (or was inserted/removed).
    Changed,
    /// No record matched the event's identifier.
    Ignored,
}

impl Applied {
    /// Returns true if the event touched at least one record.
    pub fn is_changed(self) -> bool {
        matches!(self, Applied::Changed)
    }

    pub(crate) fn from_matches(matched: usize) -> Self {
        if matched > 0 {
            Applied::Changed
        } else {
            Applied::Ignored
        }
    }
}
