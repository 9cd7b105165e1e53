//! The task that owns the coordinator.
//!
//! All game-state mutation happens here, one command at a time, in arrival
//! order. Effects returned by the coordinator are executed before the next
//! command is read. Delivery failures are logged and never undo state.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::bus::{publish_message, BusPublisher};
use crate::domain::GameSnapshot;
use crate::error::AppError;
use crate::protocol::{BusEvent, Outbound};
use crate::services::move_flow::MoveCoordinator;
use crate::ws::Notifier;

pub const COMMAND_BUFFER: usize = 256;

#[derive(Debug)]
pub enum Command {
    Bus(BusEvent),
    /// Reset the game and reply with the post-reset snapshot.
    Reset(oneshot::Sender<GameSnapshot>),
    Snapshot(oneshot::Sender<GameSnapshot>),
}

/// Cloneable sender side used by the bus subscriber and HTTP handlers.
#[derive(Clone, Debug)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<Command>,
}

impl CoordinatorHandle {
    pub async fn dispatch(&self, event: BusEvent) -> Result<(), AppError> {
        self.tx
            .send(Command::Bus(event))
            .await
            .map_err(|_| AppError::coordinator_unavailable("Coordinator is not running"))
    }

    pub async fn reset(&self) -> Result<GameSnapshot, AppError> {
        self.request(Command::Reset).await
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot, AppError> {
        self.request(Command::Snapshot).await
    }

    async fn request(
        &self,
        make: impl FnOnce(oneshot::Sender<GameSnapshot>) -> Command,
    ) -> Result<GameSnapshot, AppError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| AppError::coordinator_unavailable("Coordinator is not running"))?;
        reply_rx
            .await
            .map_err(|_| AppError::coordinator_unavailable("Coordinator dropped the request"))
    }
}

pub struct EventLoop {
    coordinator: MoveCoordinator,
    rx: mpsc::Receiver<Command>,
    publisher: Arc<dyn BusPublisher>,
    notifier: Arc<dyn Notifier>,
}

impl EventLoop {
    pub fn new(
        coordinator: MoveCoordinator,
        publisher: Arc<dyn BusPublisher>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, CoordinatorHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        (
            Self {
                coordinator,
                rx,
                publisher,
                notifier,
            },
            CoordinatorHandle { tx },
        )
    }

    /// Run until every `CoordinatorHandle` has been dropped.
    pub async fn run(mut self) {
        info!(engine_side = %self.coordinator.engine_side(), "Coordinator started");

        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Bus(event) => {
                    let effects = self.coordinator.handle(event, Instant::now());
                    self.execute(effects).await;
                }
                Command::Reset(reply) => {
                    let effects = self
                        .coordinator
                        .handle(BusEvent::ResetRequested, Instant::now());
                    self.execute(effects).await;
                    if reply.send(self.coordinator.snapshot()).is_err() {
                        debug!("Reset requester went away");
                    }
                }
                Command::Snapshot(reply) => {
                    if reply.send(self.coordinator.snapshot()).is_err() {
                        debug!("Snapshot requester went away");
                    }
                }
            }
        }

        info!("Coordinator stopped");
    }

    async fn execute(&self, effects: Vec<Outbound>) {
        for effect in effects {
            match effect {
                Outbound::Publish(message) => {
                    if let Err(err) = publish_message(self.publisher.as_ref(), &message).await {
                        error!(topic = %message.topic(), error = %err, "Bus publish failed");
                    }
                }
                Outbound::Broadcast(notification) => {
                    match serde_json::to_value(&notification) {
                        Ok(payload) => self.broadcast(&payload, notification.kind()),
                        Err(err) => error!(
                            kind = notification.kind(),
                            error = %err,
                            "Failed to serialize notification"
                        ),
                    }
                }
                Outbound::Relay(payload) => {
                    let kind = payload
                        .get("type")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("unknown")
                        .to_string();
                    self.broadcast(&payload, &kind);
                }
            }
        }
    }

    fn broadcast(&self, payload: &serde_json::Value, kind: &str) {
        if let Err(err) = self.notifier.broadcast(payload) {
            warn!(kind, error = %err, "Notification broadcast failed");
        }
    }
}

/// Start the coordinator task.
pub fn spawn_coordinator(
    coordinator: MoveCoordinator,
    publisher: Arc<dyn BusPublisher>,
    notifier: Arc<dyn Notifier>,
) -> (CoordinatorHandle, JoinHandle<()>) {
    let (event_loop, handle) = EventLoop::new(coordinator, publisher, notifier);
    let task = tokio::spawn(event_loop.run());
    (handle, task)
}
