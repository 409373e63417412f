//! # Flow Configuration
//!
//! Timing and sizing knobs for the workflows.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LUMEN_GATE_POLL_INTERVAL_MS=50                                     │
//! │     LUMEN_GATE_ON_TIMEOUT=abort                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/lumen/flow.toml (Linux)                                  │
//! │     ~/Library/Application Support/app.lumen.client/flow.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # flow.toml
//! [gate]
//! poll_interval_ms = 50
//! refresh_timeout_ms = 1000
//! invite_timeout_ms = 1000
//! on_timeout = "proceed"   # proceed | abort
//!
//! [notifications]
//! engagement_debounce_ms = 350
//! page_size = 99
//! page_offset = ""
//!
//! [orchestrator]
//! queue_capacity = 64
//!
//! [logging]
//! filter = "lumen_flow=debug,lumen_core=info,warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{FlowError, FlowResult};
use crate::gate::GatePolicy;

/// Largest page the node accepts in one list call.
const MAX_PAGE_SIZE: usize = 1000;

// =============================================================================
// Gate Settings
// =============================================================================

/// Online-Gate timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    /// Sleep between connectivity samples.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// How long a refresh waits for connectivity.
    #[serde(default = "default_gate_timeout")]
    pub refresh_timeout_ms: u64,

    /// How long viewing an invite waits for connectivity.
    #[serde(default = "default_gate_timeout")]
    pub invite_timeout_ms: u64,

    /// What a timed-out gate means for the waiting workflow.
    #[serde(default)]
    pub on_timeout: GatePolicy,
}

fn default_poll_interval() -> u64 {
    50
}

fn default_gate_timeout() -> u64 {
    1000
}

impl Default for GateSettings {
    fn default() -> Self {
        GateSettings {
            poll_interval_ms: default_poll_interval(),
            refresh_timeout_ms: default_gate_timeout(),
            invite_timeout_ms: default_gate_timeout(),
            on_timeout: GatePolicy::default(),
        }
    }
}

impl GateSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }

    pub fn invite_timeout(&self) -> Duration {
        Duration::from_millis(self.invite_timeout_ms)
    }
}

// =============================================================================
// Notification Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Delay between a notification tap and the view, so navigation settles.
    #[serde(default = "default_engagement_debounce")]
    pub engagement_debounce_ms: u64,

    /// Records requested per refresh.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Offset cursor passed to the node; empty means the newest page.
    #[serde(default)]
    pub page_offset: String,
}

fn default_engagement_debounce() -> u64 {
    350
}

fn default_page_size() -> usize {
    99
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            engagement_debounce_ms: default_engagement_debounce(),
            page_size: default_page_size(),
            page_offset: String::new(),
        }
    }
}

impl NotificationSettings {
    pub fn engagement_debounce(&self) -> Duration {
        Duration::from_millis(self.engagement_debounce_ms)
    }
}

// =============================================================================
// Orchestrator / Logging Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    /// Capacity of the action queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        OrchestratorSettings {
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "lumen_flow=debug,lumen_core=info,warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Flow Configuration
// =============================================================================

/// Complete flow configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default)]
    pub gate: GateSettings,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub orchestrator: OrchestratorSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl FlowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (flow.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> FlowResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading flow config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load flow config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> FlowResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| FlowError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FlowError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| FlowError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Flow config saved");
        Ok(())
    }

    pub fn validate(&self) -> FlowResult<()> {
        // A zero interval would turn the gate into a busy loop.
        if self.gate.poll_interval_ms == 0 {
            return Err(FlowError::InvalidConfig(
                "gate.poll_interval_ms must be greater than 0".into(),
            ));
        }

        if self.notifications.page_size == 0 || self.notifications.page_size > MAX_PAGE_SIZE {
            return Err(FlowError::InvalidConfig(format!(
                "notifications.page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if self.orchestrator.queue_capacity == 0 {
            return Err(FlowError::InvalidConfig(
                "orchestrator.queue_capacity must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("LUMEN_GATE_POLL_INTERVAL_MS") {
            if let Ok(ms) = value.parse::<u64>() {
                self.gate.poll_interval_ms = ms;
            }
        }

        if let Ok(value) = std::env::var("LUMEN_REFRESH_TIMEOUT_MS") {
            if let Ok(ms) = value.parse::<u64>() {
                self.gate.refresh_timeout_ms = ms;
            }
        }

        if let Ok(value) = std::env::var("LUMEN_INVITE_TIMEOUT_MS") {
            if let Ok(ms) = value.parse::<u64>() {
                self.gate.invite_timeout_ms = ms;
            }
        }

        if let Ok(value) = std::env::var("LUMEN_GATE_ON_TIMEOUT") {
            match value.parse() {
                Ok(policy) => {
                    debug!(%policy, "Overriding gate policy from environment");
                    self.gate.on_timeout = policy;
                }
                Err(_) => warn!(value = %value, "Unknown gate policy in environment"),
            }
        }

        if let Ok(value) = std::env::var("LUMEN_NOTIFICATION_PAGE_SIZE") {
            if let Ok(size) = value.parse::<usize>() {
                self.notifications.page_size = size;
            }
        }

        if let Ok(filter) = std::env::var("LUMEN_LOG") {
            self.logging.filter = filter;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "lumen", "client")
            .map(|dirs| dirs.config_dir().join("flow.toml"))
    }
}
