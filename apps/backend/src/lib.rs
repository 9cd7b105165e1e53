#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod bus;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod protocol;
pub mod routes;
pub mod services;
pub mod state;
pub mod test_support;
pub mod trace_ctx;
pub mod ws;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use bus::{BusPublisher, RedisBus};
pub use config::AppConfig;
pub use error::AppError;
pub use errors::ErrorCode;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use services::{spawn_coordinator, CoordinatorHandle, MoveCoordinator};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
