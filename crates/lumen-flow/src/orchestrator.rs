//! # Orchestrator
//!
//! Owns the action queue and runs one workflow task per action.
//!
//! ## Task Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrchestratorHandle::dispatch ──┐                                       │
//! │                                 ▼                                       │
//! │                        ┌─────────────────┐                              │
//! │  Workflows::enqueue ──►│  action queue   │  (bounded, queue_capacity)   │
//! │   (follow-ups)         └────────┬────────┘                              │
//! │                                 ▼                                       │
//! │                        ┌─────────────────┐   tokio::spawn per action    │
//! │  shutdown() ──────────►│  action router  │──────────────┬─────────┐     │
//! │                        └─────────────────┘              ▼         ▼     │
//! │                                                   Workflows::run  ...   │
//! │                                                                         │
//! │  Workflows interleave at their suspension points. Store writes are      │
//! │  synchronous and never overlap. Upload events skip the spawn and are    │
//! │  applied by the router itself, in the order they were dispatched.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shutdown stops the router. Workflows already running finish on their own;
//! nothing cancels them.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::action::Action;
use crate::collaborators::Collaborators;
use crate::config::FlowConfig;
use crate::error::{FlowError, FlowResult};
use crate::gate::{OnlineGate, PollingGate};
use crate::state::{StoreSnapshot, Stores};
use crate::workflows::Workflows;

pub struct Orchestrator;

impl Orchestrator {
    /// Validates the config and starts the router with a [`PollingGate`]
    /// over the connectivity collaborator.
    pub fn spawn(config: FlowConfig, collaborators: Collaborators) -> FlowResult<OrchestratorHandle> {
        let gate = Arc::new(PollingGate::new(
            collaborators.connectivity.clone(),
            config.gate.poll_interval(),
        ));
        Self::spawn_with_gate(config, collaborators, gate)
    }

    /// Same as [`Orchestrator::spawn`] with a caller-supplied gate.
    pub fn spawn_with_gate(
        config: FlowConfig,
        collaborators: Collaborators,
        gate: Arc<dyn OnlineGate>,
    ) -> FlowResult<OrchestratorHandle> {
        config.validate()?;

        let (actions_tx, actions_rx) = mpsc::channel(config.orchestrator.queue_capacity);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let stores = Arc::new(Stores::new());

        let workflows = Arc::new(Workflows::new(
            Arc::new(config),
            stores.clone(),
            collaborators,
            gate,
            actions_tx.clone(),
        ));

        let router = tokio::spawn(Self::action_router(workflows, actions_rx, shutdown_rx));
        info!("Orchestrator started");

        Ok(OrchestratorHandle {
            actions_tx,
            shutdown_tx,
            stores,
            router: Arc::new(Mutex::new(Some(router))),
        })
    }

    async fn action_router(
        workflows: Arc<Workflows>,
        mut actions_rx: mpsc::Receiver<Action>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                Some(action) = actions_rx.recv() => {
                    debug!(action = action.name(), "Routing action");
                    match action {
                        // Uploader callbacks come from one source and must
                        // land in dispatch order.
                        Action::Upload(event) => workflows.handle_upload(event),
                        action => {
                            let workflows = workflows.clone();
                            tokio::spawn(async move { workflows.run(action).await });
                        }
                    }
                }

                _ = shutdown_rx.recv() => {
                    info!("Action router received shutdown");
                    break;
                }
            }
        }

        info!("Action router stopped");
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Handle for driving a running orchestrator from outside.
#[derive(Clone)]
pub struct OrchestratorHandle {
    actions_tx: mpsc::Sender<Action>,
    shutdown_tx: mpsc::Sender<()>,
    stores: Arc<Stores>,
    router: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl OrchestratorHandle {
    /// Enqueues an action. Fails once the router has stopped.
    pub async fn dispatch(&self, action: Action) -> FlowResult<()> {
        self.actions_tx
            .send(action)
            .await
            .map_err(|_| FlowError::ShuttingDown)
    }

    pub fn stores(&self) -> &Arc<Stores> {
        &self.stores
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.stores.snapshot()
    }

    /// Stops the router and waits for it to exit. Safe to call twice.
    pub async fn shutdown(&self) {
        let Some(router) = self.router.lock().await.take() else {
            return;
        };

        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = router.await {
            debug!(error = %e, "Action router ended abnormally");
        }
    }
}
