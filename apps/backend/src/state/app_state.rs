use std::sync::Arc;

use crate::bus::BusPublisher;
use crate::config::AppConfig;
use crate::services::event_loop::CoordinatorHandle;
use crate::ws::NotificationHub;

/// Shared resources handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: CoordinatorHandle,
    pub publisher: Arc<dyn BusPublisher>,
    pub hub: Arc<NotificationHub>,
    pub config: Arc<AppConfig>,
    /// Client for downstream health probes.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        coordinator: CoordinatorHandle,
        publisher: Arc<dyn BusPublisher>,
        hub: Arc<NotificationHub>,
        config: AppConfig,
    ) -> Self {
        Self {
            coordinator,
            publisher,
            hub,
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}
