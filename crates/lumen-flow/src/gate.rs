//! # Online-Gate
//!
//! Suspends a workflow until the connectivity signal is true or a timeout
//! elapses.
//!
//! ## Poll Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sample ──► online? ── yes ──► return true (no delay)                   │
//! │                │                                                        │
//! │                no                                                       │
//! │                ▼                                                        │
//! │  ┌──► sleep(interval) ──► sample ──► remaining -= interval ──┐          │
//! │  │                                                           │          │
//! │  └──────────── !online && remaining > 0 ◄────────────────────┘          │
//! │                                                                         │
//! │  return last sample                                                     │
//! │                                                                         │
//! │  Worst-case extra latency after the signal flips: one interval.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers go through the [`OnlineGate`] trait so the wait strategy can be
//! swapped without touching workflows. What a `false` result means is
//! decided by [`GatePolicy`], not by the gate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::collaborators::Connectivity;
use crate::error::FlowError;

/// Floor for the poll interval; a zero sleep would spin.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

// =============================================================================
// Gate Trait
// =============================================================================

#[async_trait]
pub trait OnlineGate: Send + Sync {
    /// Waits until online or until `timeout` has been used up.
    ///
    /// Returns the last connectivity sample.
    async fn wait_until_online(&self, timeout: Duration) -> bool;
}

// =============================================================================
// Gate Policy
// =============================================================================

/// What a workflow does when the gate returns false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// Carry on as if online; the node call will fail on its own if needed.
    #[default]
    Proceed,
    /// Stop the dependent workflow.
    Abort,
}

impl GatePolicy {
    pub fn should_abort(&self, online: bool) -> bool {
        !online && *self == GatePolicy::Abort
    }
}

impl std::fmt::Display for GatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatePolicy::Proceed => write!(f, "proceed"),
            GatePolicy::Abort => write!(f, "abort"),
        }
    }
}

impl std::str::FromStr for GatePolicy {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "proceed" | "continue" => Ok(GatePolicy::Proceed),
            "abort" | "cancel" => Ok(GatePolicy::Abort),
            other => Err(FlowError::InvalidConfig(format!(
                "Unknown gate policy: '{}'. Valid options: proceed, abort",
                other
            ))),
        }
    }
}

// =============================================================================
// Polling Gate
// =============================================================================

/// Cooperative polling implementation of [`OnlineGate`].
///
/// Each iteration sleeps on the tokio timer for the full interval, so the
/// task yields to the scheduler between samples.
pub struct PollingGate {
    connectivity: Arc<dyn Connectivity>,
    interval: Duration,
}

impl PollingGate {
    pub fn new(connectivity: Arc<dyn Connectivity>, interval: Duration) -> Self {
        PollingGate {
            connectivity,
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl OnlineGate for PollingGate {
    async fn wait_until_online(&self, timeout: Duration) -> bool {
        let mut remaining = timeout;
        let mut online = self.connectivity.is_online();

        while !online && !remaining.is_zero() {
            tokio::time::sleep(self.interval).await;
            online = self.connectivity.is_online();
            remaining = remaining.saturating_sub(self.interval);
        }

        if !online {
            debug!(timeout_ms = timeout.as_millis() as u64, "Online-Gate timed out");
        }
        online
    }
}
