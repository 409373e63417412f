use async_trait::async_trait;
use lumen_core::{NotificationRecord, RawNotification, ThreadData};
use lumen_flow::collaborators::{
    Diagnostics, Display, Navigator, NodeApi, Platform, PlatformInfo, Preferences, Route,
    ServiceStatus, ThreadDirectory,
};
use lumen_flow::{FlowError, FlowResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::time::Duration;

fn fail_if(flag: &AtomicBool, call: &str) -> FlowResult<()> {
    if flag.load(Ordering::SeqCst) {
        Err(FlowError::collaborator("node", format!("{} rejected", call)))
    } else {
        Ok(())
    }
}

// =============================================================================
// Node
// =============================================================================

/// Node fake that records every call as `name` or `name:arg`.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeNode {
    pub calls: Mutex<Vec<String>>,
    pub listing: Mutex<Vec<RawNotification>>,
    pub list_delay: Mutex<Duration>,
    pub fail_mark_read: AtomicBool,
    pub fail_mark_all: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_pair: AtomicBool,
    pub fail_accept: AtomicBool,
}

#[allow(dead_code)]
impl FakeNode {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn set_listing(&self, listing: Vec<RawNotification>) {
        *self.listing.lock().unwrap() = listing;
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl NodeApi for FakeNode {
    async fn enable_notifications(&self) -> FlowResult<()> {
        self.record("enable_notifications".into());
        Ok(())
    }

    async fn mark_all_read(&self) -> FlowResult<()> {
        self.record("mark_all_read".into());
        fail_if(&self.fail_mark_all, "mark_all_read")
    }

    async fn mark_read(&self, id: &str) -> FlowResult<()> {
        self.record(format!("mark_read:{}", id));
        fail_if(&self.fail_mark_read, "mark_read")
    }

    async fn list_notifications(&self, offset: &str, limit: usize) -> FlowResult<Vec<RawNotification>> {
        self.record(format!("list_notifications:{}:{}", offset, limit));
        let delay = *self.list_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        fail_if(&self.fail_list, "list_notifications")?;
        Ok(self.listing.lock().unwrap().clone())
    }

    async fn pair_device(&self, public_key: &str) -> FlowResult<()> {
        self.record(format!("pair_device:{}", public_key));
        fail_if(&self.fail_pair, "pair_device")
    }

    async fn accept_thread_invite(&self, id: &str, thread_name: &str) -> FlowResult<()> {
        self.record(format!("accept_thread_invite:{}:{}", id, thread_name));
        fail_if(&self.fail_accept, "accept_thread_invite")
    }
}

// =============================================================================
// Preferences / Platform / Threads
// =============================================================================

/// Service switches keyed by service name. Unknown keys read as unset.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakePreferences {
    pub statuses: Mutex<HashMap<String, bool>>,
    pub fail: AtomicBool,
}

#[allow(dead_code)]
impl FakePreferences {
    pub fn set(&self, key: &str, enabled: bool) {
        self.statuses.lock().unwrap().insert(key.to_string(), enabled);
    }
}

#[async_trait]
impl Preferences for FakePreferences {
    async fn service_status(&self, service_key: &str) -> FlowResult<Option<ServiceStatus>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FlowError::collaborator("preferences", "storage unavailable"));
        }
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(service_key)
            .map(|&status| ServiceStatus { status }))
    }
}

#[allow(dead_code)]
pub struct FakePlatform {
    pub platform: Mutex<Platform>,
    pub app_state: Mutex<String>,
}

#[allow(dead_code)]
impl FakePlatform {
    pub fn new(platform: Platform, app_state: &str) -> Self {
        FakePlatform {
            platform: Mutex::new(platform),
            app_state: Mutex::new(app_state.to_string()),
        }
    }

    pub fn set(&self, platform: Platform, app_state: &str) {
        *self.platform.lock().unwrap() = platform;
        *self.app_state.lock().unwrap() = app_state.to_string();
    }
}

impl PlatformInfo for FakePlatform {
    fn platform(&self) -> Platform {
        *self.platform.lock().unwrap()
    }

    fn app_state(&self) -> String {
        self.app_state.lock().unwrap().clone()
    }
}

#[allow(dead_code)]
#[derive(Default)]
pub struct FakeThreads {
    pub threads: Mutex<HashMap<String, ThreadData>>,
}

#[allow(dead_code)]
impl FakeThreads {
    pub fn add(&self, id: &str, name: &str) {
        self.threads.lock().unwrap().insert(
            id.to_string(),
            ThreadData {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
    }
}

impl ThreadDirectory for FakeThreads {
    fn thread_data(&self, thread_id: &str) -> Option<ThreadData> {
        self.threads.lock().unwrap().get(thread_id).cloned()
    }
}

// =============================================================================
// Navigator / Display / Diagnostics
// =============================================================================

#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingNavigator {
    pub calls: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

#[allow(dead_code)]
impl RecordingNavigator {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> FlowResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FlowError::collaborator("navigator", "no navigation container"));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl Navigator for RecordingNavigator {
    fn set_active_thread(&self, thread_id: &str) -> FlowResult<()> {
        self.record(format!("set_active_thread:{}", thread_id))
    }

    fn set_active_target(&self, target: Option<&str>) -> FlowResult<()> {
        self.record(format!("set_active_target:{}", target.unwrap_or("-")))
    }

    fn navigate(&self, route: &Route) -> FlowResult<()> {
        self.record(format!("navigate:{}", route.name()))
    }
}

#[allow(dead_code)]
pub struct RecordingDisplay {
    pub local_alerts: Mutex<Vec<String>>,
    pub invite_alerts: Mutex<Vec<String>>,
    pub accept_invites: AtomicBool,
    pub fail: AtomicBool,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        RecordingDisplay {
            local_alerts: Mutex::new(Vec::new()),
            invite_alerts: Mutex::new(Vec::new()),
            accept_invites: AtomicBool::new(true),
            fail: AtomicBool::new(false),
        }
    }
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn local_alerts(&self) -> Vec<String> {
        self.local_alerts.lock().unwrap().clone()
    }

    pub fn invite_alerts(&self) -> Vec<String> {
        self.invite_alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Display for RecordingDisplay {
    async fn show_local_alert(&self, notification: &NotificationRecord) -> FlowResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FlowError::collaborator("display", "alert rejected"));
        }
        self.local_alerts.lock().unwrap().push(notification.id.clone());
        Ok(())
    }

    async fn show_invite_alert(&self, message: &str) -> FlowResult<bool> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FlowError::collaborator("display", "alert rejected"));
        }
        self.invite_alerts.lock().unwrap().push(message.to_string());
        Ok(self.accept_invites.load(Ordering::SeqCst))
    }
}

/// Diagnostics entry as `(category, message, is_error)`.
pub type DiagnosticEntry = (String, String, bool);

#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingDiagnostics {
    pub events: Mutex<Vec<DiagnosticEntry>>,
}

#[allow(dead_code)]
impl RecordingDiagnostics {
    pub fn events(&self) -> Vec<DiagnosticEntry> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|(_, m, _)| m).collect()
    }

    pub fn errors(&self) -> Vec<DiagnosticEntry> {
        self.events().into_iter().filter(|(_, _, e)| *e).collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn log_event(&self, category: &str, message: &str, is_error: bool) {
        self.events
            .lock()
            .unwrap()
            .push((category.to_string(), message.to_string(), is_error));
    }
}
