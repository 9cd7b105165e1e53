//! In-memory stand-ins for the bus and the notification hub.
//!
//! Public so the integration tests in `tests/` can drive the event loop and
//! the HTTP routes without a broker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::bus::BusPublisher;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::protocol::Topic;
use crate::services::event_loop::spawn_coordinator;
use crate::services::move_flow::MoveCoordinator;
use crate::state::app_state::AppState;
use crate::ws::{NotificationHub, Notifier};

/// Records every publish. Can be switched into a failing mode.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(Topic, String)>>,
    failing: AtomicBool,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<(Topic, String)> {
        self.published
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn topics(&self) -> Vec<Topic> {
        self.published().into_iter().map(|(topic, _)| topic).collect()
    }

    /// Decoded payloads published on `topic`, in order.
    pub fn payloads_on(&self, topic: Topic) -> Vec<Value> {
        self.published()
            .into_iter()
            .filter(|(t, _)| *t == topic)
            .filter_map(|(_, payload)| serde_json::from_str(&payload).ok())
            .collect()
    }
}

fn unavailable() -> AppError {
    AppError::bus_unavailable(
        "recording publisher is failing",
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
    )
}

#[async_trait]
impl BusPublisher for RecordingPublisher {
    async fn publish(&self, topic: Topic, payload: String) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        if let Ok(mut guard) = self.published.lock() {
            guard.push((topic, payload));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Value>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    /// The `type` of every broadcast, in order.
    pub fn kinds(&self) -> Vec<String> {
        self.sent()
            .iter()
            .filter_map(|v| v.get("type").and_then(Value::as_str).map(str::to_string))
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn broadcast(&self, payload: &Value) -> Result<(), AppError> {
        if let Ok(mut guard) = self.sent.lock() {
            guard.push(payload.clone());
        }
        Ok(())
    }
}

/// An `AppState` backed by a running coordinator and a recording publisher.
///
/// Must be called inside a tokio runtime.
pub fn recording_state(config: AppConfig) -> (AppState, Arc<RecordingPublisher>) {
    let publisher = RecordingPublisher::new();
    let notifier = RecordingNotifier::new();
    let (handle, _task) = spawn_coordinator(
        MoveCoordinator::new(config.engine_side),
        publisher.clone(),
        notifier,
    );
    let state = AppState::new(handle, publisher.clone(), Arc::new(NotificationHub::new()), config);
    (state, publisher)
}
