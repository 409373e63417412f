pub mod mocks;

use chrono::{TimeZone, Utc};
use lumen_core::{NotificationEvent, NotificationKind, NotificationRecord, RawNotification};
use lumen_flow::collaborators::Platform;
use lumen_flow::{Action, Collaborators, FlowConfig, PollingGate, Stores, Workflows};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::mpsc;

#[allow(unused_imports)]
pub use mocks::{
    FakeNode, FakePlatform, FakePreferences, FakeThreads, RecordingDiagnostics, RecordingDisplay,
    RecordingNavigator,
};

/// Every fake a workflow can reach, kept so tests can inspect them.
#[allow(dead_code)]
pub struct Fakes {
    pub node: Arc<FakeNode>,
    pub preferences: Arc<FakePreferences>,
    pub online: Arc<AtomicBool>,
    pub platform: Arc<FakePlatform>,
    pub threads: Arc<FakeThreads>,
    pub navigator: Arc<RecordingNavigator>,
    pub display: Arc<RecordingDisplay>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

#[allow(dead_code)]
impl Fakes {
    /// Online Android device in the foreground, no preferences set.
    pub fn new() -> Self {
        Fakes {
            node: Arc::new(FakeNode::default()),
            preferences: Arc::new(FakePreferences::default()),
            online: Arc::new(AtomicBool::new(true)),
            platform: Arc::new(FakePlatform::new(Platform::Android, "active")),
            threads: Arc::new(FakeThreads::default()),
            navigator: Arc::new(RecordingNavigator::default()),
            display: Arc::new(RecordingDisplay::default()),
            diagnostics: Arc::new(RecordingDiagnostics::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            node: self.node.clone(),
            preferences: self.preferences.clone(),
            connectivity: self.online.clone(),
            platform: self.platform.clone(),
            threads: self.threads.clone(),
            navigator: self.navigator.clone(),
            display: self.display.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Workflows wired to fakes, with the follow-up queue exposed.
#[allow(dead_code)]
pub struct Harness {
    pub workflows: Workflows,
    pub followups: mpsc::Receiver<Action>,
    pub fakes: Fakes,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        Self::with_config(FlowConfig::default())
    }

    pub fn with_config(config: FlowConfig) -> Self {
        let fakes = Fakes::new();
        let (tx, rx) = mpsc::channel(16);
        let gate = Arc::new(PollingGate::new(
            fakes.online.clone(),
            config.gate.poll_interval(),
        ));
        let workflows = Workflows::new(
            Arc::new(config),
            Arc::new(Stores::new()),
            fakes.collaborators(),
            gate,
            tx,
        );
        Harness {
            workflows,
            followups: rx,
            fakes,
        }
    }

    pub fn stores(&self) -> &Stores {
        self.workflows.stores()
    }

    /// Puts records into the notification store as a finished refresh would.
    pub fn seed_notifications(&self, records: Vec<NotificationRecord>) {
        assert!(self.stores().try_begin_refresh());
        self.stores()
            .apply_notification(NotificationEvent::RefreshSucceeded { records });
    }
}

// =============================================================================
// Fixtures
// =============================================================================

#[allow(dead_code)]
pub fn notification(id: &str, kind: NotificationKind) -> NotificationRecord {
    NotificationRecord {
        id: id.to_string(),
        kind,
        thread_id: Some("thread-1".to_string()),
        thread_name: Some("Trip".to_string()),
        target: Some("photo-1".to_string()),
        actor: Some("Alice".to_string()),
        body: "hello".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        read: false,
        view_failed: false,
    }
}

#[allow(dead_code)]
pub fn raw_notification(id: &str, kind: &str) -> RawNotification {
    RawNotification {
        id: id.to_string(),
        kind: kind.to_string(),
        thread_id: Some("thread-1".to_string()),
        thread_name: Some("Trip".to_string()),
        target: None,
        actor: Some("Alice".to_string()),
        body: "hello".to_string(),
        date: "2024-05-01T12:00:00Z".to_string(),
        read: false,
    }
}
