//! # Domain Types
//!
//! Records owned by the three stores, plus the shapes exchanged with the
//! native node.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │   UploadItem    │   │ PairingRequest  │   │ NotificationRecord  │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  content_hash   │   │  public_key     │   │  id                 │   │
//! │  │  thread_id      │   │  state          │   │  kind               │   │
//! │  │  state          │   └─────────────────┘   │  thread_id?         │   │
//! │  │  progress       │                         │  target?            │   │
//! │  │  remaining_att. │                         │  created_at         │   │
//! │  └─────────────────┘                         └─────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │  UploadState    │   │  PairingState   │   │ NotificationKind    │   │
//! │  │  Pending        │   │  Pending        │   │ CommentAdded        │   │
//! │  │  Processing     │   │  Paired         │   │ LikeAdded           │   │
//! │  │  Complete       │   │  Error          │   │ FilesAdded          │   │
//! │  │  Error          │   └─────────────────┘   │ PeerJoined / Left   │   │
//! │  └─────────────────┘                         │ InviteReceived      │   │
//! │                                              └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::DEFAULT_UPLOAD_ATTEMPTS;

// =============================================================================
// Upload Item
// =============================================================================

/// Lifecycle state of an outbound upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    /// Queued, waiting for the uploader to pick it up.
    #[default]
    Pending,
    /// Uploader is reporting progress.
    Processing,
    /// Uploader reported success.
    Complete,
    /// Uploader reported failure.
    Error,
}

/// One outbound file transfer.
///
/// `content_hash` is the identity key for every update once the item exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UploadItem {
    /// Local URI the item was queued from.
    pub uri: String,

    /// Stable content identifier.
    pub content_hash: String,

    /// Thread the content is being added to.
    pub thread_id: String,

    /// Where the node expects the encrypted payload.
    pub remote_payload_path: String,

    pub state: UploadState,

    /// Fraction 0.0–1.0, only meaningful while Processing.
    pub progress: f64,

    /// Attempts left before the item stays in Error for good.
    pub remaining_attempts: u32,

    /// Message from the most recent failure.
    pub last_error: Option<String>,
}

impl UploadItem {
    /// Creates a Pending item with the default attempt budget.
    pub fn new(
        uri: impl Into<String>,
        thread_id: impl Into<String>,
        content_hash: impl Into<String>,
        remote_payload_path: impl Into<String>,
    ) -> Self {
        UploadItem {
            uri: uri.into(),
            content_hash: content_hash.into(),
            thread_id: thread_id.into(),
            remote_payload_path: remote_payload_path.into(),
            state: UploadState::Pending,
            progress: 0.0,
            remaining_attempts: DEFAULT_UPLOAD_ATTEMPTS,
            last_error: None,
        }
    }

    /// Returns true if a user-triggered retry is allowed.
    pub fn can_retry(&self) -> bool {
        self.state == UploadState::Error && self.remaining_attempts > 0
    }
}

/// Processing status of a local media URI (camera roll entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MediaStatus {
    Processing,
    Complete,
    Error,
}

// =============================================================================
// Pairing Request
// =============================================================================

/// State of one device-pairing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PairingState {
    #[default]
    Pending,
    Paired,
    Error,
}

/// One device-pairing attempt, keyed by the requesting device's public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PairingRequest {
    pub public_key: String,
    pub state: PairingState,
}

impl PairingRequest {
    pub fn pending(public_key: impl Into<String>) -> Self {
        PairingRequest {
            public_key: public_key.into(),
            state: PairingState::Pending,
        }
    }

    /// Returns true once the attempt reached Paired or Error.
    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, PairingState::Pending)
    }
}

// =============================================================================
// Notifications
// =============================================================================

/// The six kinds of inbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    CommentAdded,
    LikeAdded,
    FilesAdded,
    PeerJoined,
    PeerLeft,
    InviteReceived,
}

impl NotificationKind {
    /// Wire code used by the node and as the per-kind preference key.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::CommentAdded => "COMMENT_ADDED",
            NotificationKind::LikeAdded => "LIKE_ADDED",
            NotificationKind::FilesAdded => "FILES_ADDED",
            NotificationKind::PeerJoined => "PEER_JOINED",
            NotificationKind::PeerLeft => "PEER_LEFT",
            NotificationKind::InviteReceived => "INVITE_RECEIVED",
        }
    }

    /// Kinds whose view opens a piece of content inside a thread.
    pub fn targets_content(&self) -> bool {
        matches!(
            self,
            NotificationKind::CommentAdded
                | NotificationKind::LikeAdded
                | NotificationKind::FilesAdded
        )
    }

    /// Kinds whose view opens the thread membership screen.
    pub fn targets_membership(&self) -> bool {
        matches!(self, NotificationKind::PeerJoined | NotificationKind::PeerLeft)
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COMMENT_ADDED" => Ok(NotificationKind::CommentAdded),
            "LIKE_ADDED" => Ok(NotificationKind::LikeAdded),
            "FILES_ADDED" => Ok(NotificationKind::FilesAdded),
            "PEER_JOINED" => Ok(NotificationKind::PeerJoined),
            "PEER_LEFT" => Ok(NotificationKind::PeerLeft),
            "INVITE_RECEIVED" => Ok(NotificationKind::InviteReceived),
            other => Err(CoreError::UnknownNotificationKind(other.to_string())),
        }
    }
}

/// One inbound event mirrored from the node.
///
/// Read state is owned by the node; `read` only flips after the node
/// acknowledged it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NotificationRecord {
    /// Globally unique id assigned by the node.
    pub id: String,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    /// Absent for events that are not about a thread.
    #[serde(default)]
    pub thread_id: Option<String>,

    #[serde(default)]
    pub thread_name: Option<String>,

    /// Photo / content reference.
    #[serde(default)]
    pub target: Option<String>,

    /// Display name of whoever caused the event.
    #[serde(default)]
    pub actor: Option<String>,

    #[serde(default)]
    pub body: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub read: bool,

    /// Error badge shown when viewing the notification failed.
    #[serde(default)]
    pub view_failed: bool,
}

impl NotificationRecord {
    /// Derives the alert payload for a thread invite.
    ///
    /// Only InviteReceived notifications that name a thread produce one.
    pub fn invite_payload(&self) -> Option<InvitePayload> {
        if self.kind != NotificationKind::InviteReceived {
            return None;
        }
        let thread_name = self.thread_name.as_deref().filter(|n| !n.trim().is_empty())?;
        let actor = self.actor.as_deref().unwrap_or("Someone");

        Some(InvitePayload {
            title: "Thread invite".to_string(),
            message: format!("{} invited you to join {}", actor, thread_name),
        })
    }
}

/// Notification as delivered by the node's list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNotification {
    pub id: String,
    /// Kind code, e.g. `COMMENT_ADDED`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub thread_name: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub body: String,
    /// RFC 3339 timestamp.
    pub date: String,
    #[serde(default)]
    pub read: bool,
}

impl RawNotification {
    /// Maps the node's shape into a typed record.
    pub fn into_record(self) -> CoreResult<NotificationRecord> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            }
            .into());
        }

        let kind = self.kind.parse::<NotificationKind>()?;
        let created_at = DateTime::parse_from_rfc3339(&self.date)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "date".to_string(),
                reason: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(NotificationRecord {
            id: self.id,
            kind,
            thread_id: self.thread_id.filter(|t| !t.is_empty()),
            thread_name: self.thread_name,
            target: self.target.filter(|t| !t.is_empty()),
            actor: self.actor,
            body: self.body,
            created_at,
            read: self.read,
            view_failed: false,
        })
    }
}

/// Text for the invite alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvitePayload {
    pub title: String,
    pub message: String,
}

/// Thread details resolved from a thread id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ThreadData {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
