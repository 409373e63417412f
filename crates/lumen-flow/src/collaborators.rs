//! # Collaborators
//!
//! Contracts for the external systems the workflows call but do not
//! implement: the native node, preferences, connectivity, platform state,
//! thread lookup, navigation, display and diagnostics.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Workflows ──► NodeApi        enable / mark read / list / pair / invite │
//! │            ──► Preferences    per-service on/off switches              │
//! │            ──► Connectivity   online flag (read by the Online-Gate)    │
//! │            ──► PlatformInfo   OS + foreground/background state         │
//! │            ──► ThreadDirectory thread id → ThreadData                  │
//! │            ──► Navigator      active thread/content + screen changes   │
//! │            ──► Display        local alerts, invite alerts              │
//! │            ──► Diagnostics    user-visible device log                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use lumen_core::{NotificationRecord, RawNotification, ThreadData};

use crate::error::FlowResult;

// =============================================================================
// Node API
// =============================================================================

/// The native peer-to-peer node.
#[async_trait]
pub trait NodeApi: Send + Sync {
    async fn enable_notifications(&self) -> FlowResult<()>;

    async fn mark_all_read(&self) -> FlowResult<()>;

    async fn mark_read(&self, id: &str) -> FlowResult<()>;

    async fn list_notifications(&self, offset: &str, limit: usize) -> FlowResult<Vec<RawNotification>>;

    async fn pair_device(&self, public_key: &str) -> FlowResult<()>;

    async fn accept_thread_invite(&self, id: &str, thread_name: &str) -> FlowResult<()>;
}

// =============================================================================
// Preferences
// =============================================================================

/// Preference key for the global notifications switch.
pub const NOTIFICATIONS_SERVICE: &str = "notifications";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: bool,
}

#[async_trait]
pub trait Preferences: Send + Sync {
    /// `None` when the service has never been configured.
    async fn service_status(&self, service_key: &str) -> FlowResult<Option<ServiceStatus>>;
}

// =============================================================================
// Connectivity
// =============================================================================

/// Readable "online" signal.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

impl Connectivity for AtomicBool {
    fn is_online(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl Connectivity for watch::Receiver<bool> {
    fn is_online(&self) -> bool {
        *self.borrow()
    }
}

// =============================================================================
// Platform
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    /// iOS never reports foreground state to us, so alerts always show.
    pub fn detects_foreground(&self) -> bool {
        matches!(self, Platform::Android)
    }
}

pub trait PlatformInfo: Send + Sync {
    fn platform(&self) -> Platform;

    /// Current app state string, e.g. `active`, `background`,
    /// `backgroundFromForeground`.
    fn app_state(&self) -> String;

    /// Whether a local alert should be shown right now.
    fn should_display_alert(&self) -> bool {
        !self.platform().detects_foreground() || self.app_state().contains("background")
    }
}

// =============================================================================
// Threads / Navigation / Display / Diagnostics
// =============================================================================

pub trait ThreadDirectory: Send + Sync {
    fn thread_data(&self, thread_id: &str) -> Option<ThreadData>;
}

/// Screens a workflow can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Single content item of the active thread.
    Photo,
    /// Thread membership view.
    ViewThread { thread_id: String },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Photo => "PhotoScreen",
            Route::ViewThread { .. } => "ViewThread",
        }
    }

    pub fn params(&self) -> serde_json::Value {
        match self {
            Route::Photo => json!({}),
            Route::ViewThread { thread_id } => json!({ "threadId": thread_id }),
        }
    }
}

pub trait Navigator: Send + Sync {
    fn set_active_thread(&self, thread_id: &str) -> FlowResult<()>;

    fn set_active_target(&self, target: Option<&str>) -> FlowResult<()>;

    fn navigate(&self, route: &Route) -> FlowResult<()>;
}

#[async_trait]
pub trait Display: Send + Sync {
    async fn show_local_alert(&self, notification: &NotificationRecord) -> FlowResult<()>;

    /// Shows the invite alert; `Ok(false)` when the user dismissed it.
    async fn show_invite_alert(&self, message: &str) -> FlowResult<bool>;
}

pub trait Diagnostics: Send + Sync {
    fn log_event(&self, category: &str, message: &str, is_error: bool);
}

// =============================================================================
// Bundle
// =============================================================================

/// Every collaborator the orchestrator needs, bundled for construction.
#[derive(Clone)]
pub struct Collaborators {
    pub node: Arc<dyn NodeApi>,
    pub preferences: Arc<dyn Preferences>,
    pub connectivity: Arc<dyn Connectivity>,
    pub platform: Arc<dyn PlatformInfo>,
    pub threads: Arc<dyn ThreadDirectory>,
    pub navigator: Arc<dyn Navigator>,
    pub display: Arc<dyn Display>,
    pub diagnostics: Arc<dyn Diagnostics>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPlatform(Platform, &'static str);

    impl PlatformInfo for FixedPlatform {
        fn platform(&self) -> Platform {
            self.0
        }
        fn app_state(&self) -> String {
            self.1.to_string()
        }
    }

    #[test]
    fn test_alert_classification() {
        assert!(FixedPlatform(Platform::Ios, "active").should_display_alert());
        assert!(FixedPlatform(Platform::Android, "background").should_display_alert());
        assert!(FixedPlatform(Platform::Android, "backgroundFromForeground").should_display_alert());
        assert!(!FixedPlatform(Platform::Android, "active").should_display_alert());
    }

    #[test]
    fn test_route_names_and_params() {
        assert_eq!(Route::Photo.name(), "PhotoScreen");
        let route = Route::ViewThread {
            thread_id: "t-1".into(),
        };
        assert_eq!(route.name(), "ViewThread");
        assert_eq!(route.params()["threadId"], "t-1");
    }

    #[test]
    fn test_watch_connectivity() {
        let (tx, rx) = watch::channel(false);
        assert!(!rx.is_online());
        tx.send(true).unwrap();
        assert!(rx.is_online());
    }
}
