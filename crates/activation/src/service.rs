//! Tokio actor that owns the coordinator.
//!
//! One task owns the [`ActivationCoordinator`] and applies commands in
//! arrival order. Async collaborator calls run in spawned tasks and post
//! their results back as commands, so all state mutation stays on the
//! actor task.

use crate::config::ActivationConfig;
use crate::coordinator::{ActivationCoordinator, Collaborators, PendingWork};
use crate::error::{ActivationError, Result};
use crate::resolver::{ResolvedSearchTerm, SearchTermResolver};
use std::sync::Arc;
use tapsearch_context::{SurroundingText, SurroundingTextError};
use tapsearch_gesture::{InternalState, StateChangeReason, WorkTicket};
use tapsearch_heuristics::RankerVerdict;
use tapsearch_selection::{GestureEvent, SelectionChange, TapMetadata};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Capacity of the command channel.
const COMMAND_BUFFER: usize = 64;

/// Commands processed by the service task.
#[derive(Debug)]
pub enum ActivationCommand {
    Gesture(GestureEvent),
    UnhandledTap(TapMetadata),
    SelectionChanged(SelectionChange),
    Reset(StateChangeReason),
    SurroundingText {
        ticket: WorkTicket,
        result: std::result::Result<SurroundingText, SurroundingTextError>,
    },
    RankingVerdict {
        ticket: WorkTicket,
        verdict: RankerVerdict,
    },
    Resolved {
        ticket: WorkTicket,
        resolved: ResolvedSearchTerm,
    },
    TimerElapsed {
        ticket: WorkTicket,
    },
    Status(oneshot::Sender<ActivationStatus>),
    Teardown,
    Shutdown,
}

/// Point-in-time view of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationStatus {
    pub state: InternalState,
    pub previous_state: InternalState,
    pub selected_text: String,
    pub sequence_id: Option<Uuid>,
}

/// Cloneable sender side of the service.
#[derive(Debug, Clone)]
pub struct ActivationHandle {
    tx: mpsc::Sender<ActivationCommand>,
}

impl ActivationHandle {
    async fn send(&self, command: ActivationCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| ActivationError::ServiceStopped)
    }

    pub async fn gesture(&self, event: GestureEvent) -> Result<()> {
        self.send(ActivationCommand::Gesture(event)).await
    }

    pub async fn unhandled_tap(&self, metadata: TapMetadata) -> Result<()> {
        self.send(ActivationCommand::UnhandledTap(metadata)).await
    }

    pub async fn selection_changed(&self, change: SelectionChange) -> Result<()> {
        self.send(ActivationCommand::SelectionChanged(change)).await
    }

    pub async fn reset(&self, reason: StateChangeReason) -> Result<()> {
        self.send(ActivationCommand::Reset(reason)).await
    }

    pub async fn teardown(&self) -> Result<()> {
        self.send(ActivationCommand::Teardown).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(ActivationCommand::Shutdown).await
    }

    pub async fn status(&self) -> Result<ActivationStatus> {
        let (reply, rx) = oneshot::channel();
        self.send(ActivationCommand::Status(reply)).await?;
        rx.await.map_err(|_| ActivationError::ServiceStopped)
    }
}

/// The service task and its collaborators.
pub struct ActivationService {
    coordinator: ActivationCoordinator,
    collaborators: Collaborators,
    resolver: Arc<dyn SearchTermResolver>,
    tx: mpsc::Sender<ActivationCommand>,
    rx: mpsc::Receiver<ActivationCommand>,
    cancel: CancellationToken,
}

impl ActivationService {
    /// Build the service. The config is validated first.
    pub fn new(
        config: ActivationConfig,
        collaborators: Collaborators,
        resolver: Arc<dyn SearchTermResolver>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        config.validate()?;
        let coordinator = ActivationCoordinator::new(Arc::new(config), collaborators.clone());
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        Ok(Self {
            coordinator,
            collaborators,
            resolver,
            tx,
            rx,
            cancel,
        })
    }

    pub fn handle(&self) -> ActivationHandle {
        ActivationHandle {
            tx: self.tx.clone(),
        }
    }

    /// Spawn the service on the current runtime.
    pub fn spawn(self) -> (ActivationHandle, JoinHandle<()>) {
        let handle = self.handle();
        (handle, tokio::spawn(self.run()))
    }

    /// Process commands until shutdown or cancellation.
    pub async fn run(mut self) {
        tracing::info!("activation service started");
        loop {
            let command = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                command = self.rx.recv() => command,
            };
            let Some(command) = command else { break };
            if !self.apply(command) {
                break;
            }
            self.dispatch_pending_work();
        }
        self.coordinator.teardown();
        tracing::info!("activation service stopped");
    }

    /// Returns false when the loop should stop.
    fn apply(&mut self, command: ActivationCommand) -> bool {
        let coordinator = &mut self.coordinator;
        match command {
            ActivationCommand::Gesture(event) => coordinator.handle_gesture(&event),
            ActivationCommand::UnhandledTap(metadata) => coordinator.handle_unhandled_tap(metadata),
            ActivationCommand::SelectionChanged(change) => {
                coordinator.handle_selection_changed(change)
            }
            ActivationCommand::Reset(reason) => coordinator.reset(reason),
            ActivationCommand::SurroundingText { ticket, result } => {
                coordinator.on_surrounding_text(ticket, result)
            }
            ActivationCommand::RankingVerdict { ticket, verdict } => {
                coordinator.on_ranking_verdict(ticket, verdict)
            }
            ActivationCommand::Resolved { ticket, resolved } => {
                coordinator.on_resolved(ticket, resolved)
            }
            ActivationCommand::TimerElapsed { ticket } => coordinator.on_timer_elapsed(ticket),
            ActivationCommand::Status(reply) => {
                let _ = reply.send(ActivationStatus {
                    state: coordinator.state(),
                    previous_state: coordinator.previous_state(),
                    selected_text: coordinator.tracker().selected_text().to_string(),
                    sequence_id: coordinator.sequence_id(),
                });
            }
            ActivationCommand::Teardown => coordinator.teardown(),
            ActivationCommand::Shutdown => return false,
        }
        true
    }

    fn dispatch_pending_work(&mut self) {
        for work in self.coordinator.take_pending_work() {
            tracing::trace!(state = %work.ticket().state(), "dispatching work");
            let tx = self.tx.clone();
            let cancel = self.cancel.clone();
            let collaborators = &self.collaborators;

            match work {
                PendingWork::RequestSurroundingText { ticket } => {
                    let provider = Arc::clone(&collaborators.surrounding_text);
                    spawn_result(tx, cancel, async move {
                        let result = provider.request().await;
                        ActivationCommand::SurroundingText { ticket, result }
                    });
                }
                PendingWork::RunPrediction { ticket } => {
                    let Some(ranker) = collaborators.ranker.clone() else {
                        self.coordinator.on_ranking_unavailable(ticket);
                        continue;
                    };
                    spawn_result(tx, cancel, async move {
                        let verdict = ranker.run_prediction().await;
                        ActivationCommand::RankingVerdict { ticket, verdict }
                    });
                }
                PendingWork::Resolve { ticket, request } => {
                    let resolver = Arc::clone(&self.resolver);
                    spawn_result(tx, cancel, async move {
                        let resolved = resolver.resolve(request).await;
                        ActivationCommand::Resolved { ticket, resolved }
                    });
                }
                PendingWork::Timer { ticket, delay } => {
                    spawn_result(tx, cancel, async move {
                        tokio::time::sleep(delay).await;
                        ActivationCommand::TimerElapsed { ticket }
                    });
                }
            }
        }
    }
}

/// Run `work` and post its command back, unless the service is cancelled first.
fn spawn_result<F>(tx: mpsc::Sender<ActivationCommand>, cancel: CancellationToken, work: F)
where
    F: std::future::Future<Output = ActivationCommand> + Send + 'static,
{
    tokio::spawn(async move {
        let command = tokio::select! {
            _ = cancel.cancelled() => return,
            command = work => command,
        };
        if tx.send(command).await.is_err() {
            tracing::debug!("service stopped before result was delivered");
        }
    });
}
