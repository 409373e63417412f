//! # lumen-flow: Event Orchestration for the Lumen Client
//!
//! Cooperating workflows that react to native callbacks, timers and user
//! taps. They update the lumen-core stores, wait on connectivity through the
//! Online-Gate and call out to collaborators (node, navigation, display,
//! diagnostics).
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Orchestrator Architecture                          │
//! │                                                                         │
//! │  native callbacks / UI ──► OrchestratorHandle::dispatch(Action)        │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 Orchestrator (action router task)                │  │
//! │  │   one tokio task per action, follow-ups re-enter the queue       │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ notifications  │  │    pairing     │  │       uploads          │    │
//! │  │ inbound, view, │  │ pair_device,   │  │ uploader callbacks,    │    │
//! │  │ refresh, ...   │  │ pair_from_link │  │ retry guard            │    │
//! │  └───────┬────────┘  └───────┬────────┘  └───────────┬────────────┘    │
//! │          │   OnlineGate      │                       │                  │
//! │          ▼                   ▼                       ▼                  │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │        Stores (lumen-core stores + revision watch channel)       │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`action`] - Logical actions accepted by the orchestrator
//! - [`collaborators`] - Traits for external systems
//! - [`config`] - Flow configuration (gate timing, paging, queue, logging)
//! - [`error`] - Flow error types
//! - [`gate`] - Online-Gate trait, polling implementation and timeout policy
//! - [`logging`] - tracing subscriber setup
//! - [`orchestrator`] - Action router and its handle
//! - [`state`] - Shared stores
//! - [`workflows`] - The workflows themselves
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lumen_flow::{Action, FlowConfig, Orchestrator};
//!
//! let config = FlowConfig::load_or_default(None);
//! lumen_flow::logging::init_tracing(&config.logging);
//!
//! let handle = Orchestrator::spawn(config, collaborators)?;
//! handle.dispatch(Action::RefreshNotifications).await?;
//!
//! let snapshot = handle.snapshot();
//! println!("Unread: {}", snapshot.notifications.unread_count());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod action;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod gate;
pub mod logging;
pub mod orchestrator;
pub mod state;
pub mod workflows;

// =============================================================================
// Re-exports
// =============================================================================

pub use action::Action;
pub use collaborators::{
    Collaborators, Connectivity, Diagnostics, Display, Navigator, NodeApi, Platform, PlatformInfo,
    Preferences, Route, ServiceStatus, ThreadDirectory, NOTIFICATIONS_SERVICE,
};
pub use config::FlowConfig;
pub use error::{FlowError, FlowResult};
pub use gate::{GatePolicy, OnlineGate, PollingGate};
pub use orchestrator::{Orchestrator, OrchestratorHandle};
pub use state::{StoreSnapshot, Stores};
pub use workflows::{RefreshOutcome, Workflows};
