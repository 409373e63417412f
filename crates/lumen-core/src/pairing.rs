//! # Pairing Store
//!
//! Device-pairing handshake state, plus parsing of the pairing deep link
//! that starts a handshake.
//!
//! ```text
//!   Started(key) ──► Pending ──┬── Succeeded(key) ──► Paired
//!                              └── Failed(key)    ──► Error
//! ```
//!
//! Starts are not deduplicated: a second `Started` for the same key adds a
//! second entry, and the result events update every entry with that key.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::types::{PairingRequest, PairingState};
use crate::{Applied, DEFAULT_PAIRING_CODE};

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PairingEvent {
    Started { public_key: String },
    Succeeded { public_key: String },
    Failed { public_key: String },
}

// =============================================================================
// Store
// =============================================================================

/// Pairing attempts, newest first. Entries are kept for history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairingStore {
    requests: Vec<PairingRequest>,

    #[serde(skip)]
    stale_updates: u64,
}

impl PairingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[PairingRequest] {
        &self.requests
    }

    /// Most recent attempt for a key.
    pub fn latest(&self, public_key: &str) -> Option<&PairingRequest> {
        self.requests.iter().find(|r| r.public_key == public_key)
    }

    pub fn stale_updates(&self) -> u64 {
        self.stale_updates
    }

    pub fn apply(&mut self, event: PairingEvent) -> Applied {
        let applied = match event {
            PairingEvent::Started { public_key } => {
                self.requests.insert(0, PairingRequest::pending(public_key));
                Applied::Changed
            }
            PairingEvent::Succeeded { public_key } => self.settle(&public_key, PairingState::Paired),
            PairingEvent::Failed { public_key } => self.settle(&public_key, PairingState::Error),
        };

        if applied == Applied::Ignored {
            self.stale_updates += 1;
        }
        applied
    }

    pub fn reduce(mut self, event: PairingEvent) -> Self {
        self.apply(event);
        self
    }

    fn settle(&mut self, public_key: &str, state: PairingState) -> Applied {
        let mut matched = 0;
        for request in self.requests.iter_mut().filter(|r| r.public_key == public_key) {
            request.state = state;
            matched += 1;
        }
        Applied::from_matches(matched)
    }
}

// =============================================================================
// Pairing Link
// =============================================================================

/// Parameters carried by a pairing deep link.
///
/// ## Example
/// ```rust
/// use lumen_core::PairingLink;
///
/// let link = PairingLink::parse("lumen://pair?code=7H2K&key=pk-abc&peerId=Qm1").unwrap();
/// assert_eq!(link.code, "7H2K");
/// assert_eq!(link.public_key, "pk-abc");
/// assert_eq!(link.peer_id.as_deref(), Some("Qm1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingLink {
    /// Short code shown to the user for visual confirmation.
    pub code: String,
    /// Public key of the requesting device.
    pub public_key: String,
    pub peer_id: Option<String>,
}

impl PairingLink {
    /// Parses a deep link. Repeated parameters keep their first value.
    pub fn parse(link: &str) -> CoreResult<Self> {
        let url = Url::parse(link).map_err(|e| CoreError::InvalidPairingLink {
            reason: e.to_string(),
        })?;

        if url.query().map_or(true, str::is_empty) {
            return Err(CoreError::InvalidPairingLink {
                reason: "link has no query string".to_string(),
            });
        }

        let mut code = None;
        let mut public_key = None;
        let mut peer_id = None;

        for (name, value) in url.query_pairs() {
            let slot = match name.as_ref() {
                "code" => &mut code,
                "key" => &mut public_key,
                "peerId" => &mut peer_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        let public_key = public_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CoreError::InvalidPairingLink {
                reason: "missing key parameter".to_string(),
            })?;

        Ok(PairingLink {
            code: code.unwrap_or_else(|| DEFAULT_PAIRING_CODE.to_string()),
            public_key,
            peer_id: peer_id.filter(|p| !p.is_empty()),
        })
    }
}
