//! Publish/subscribe bus.

pub mod redis;

use async_trait::async_trait;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::protocol::{BusMessage, Topic};

pub use self::redis::{run_subscriber, RedisBus};

/// Outbound half of the bus.
#[async_trait]
pub trait BusPublisher: Send + Sync {
    async fn publish(&self, topic: Topic, payload: String) -> Result<(), AppError>;

    /// Round-trip to the broker, for health reporting.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Encode a typed message and publish it on its topic.
pub async fn publish_message(
    publisher: &dyn BusPublisher,
    message: &BusMessage,
) -> Result<(), AppError> {
    let payload = message.encode().map_err(|err| {
        AppError::internal(
            ErrorCode::InternalError,
            "Failed to serialize bus message",
            err,
        )
    })?;
    publisher.publish(message.topic(), payload).await
}
