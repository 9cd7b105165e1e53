//! Server push to UI clients over websockets.

pub mod hub;
pub mod session;

use serde_json::Value;

use crate::error::AppError;

pub use hub::{NotificationHub, Push};

/// Fire-and-forget broadcast to every connected UI client.
pub trait Notifier: Send + Sync {
    fn broadcast(&self, payload: &Value) -> Result<(), AppError>;
}
