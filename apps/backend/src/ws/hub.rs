use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::Notifier;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// One serialized notification, shared by every session it is sent to.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Push(pub Arc<str>);

#[derive(Default)]
pub struct NotificationHub {
    sessions: DashMap<Uuid, Recipient<Push>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, recipient: Recipient<Push>) -> Uuid {
        let token = Uuid::new_v4();
        self.sessions.insert(token, recipient);
        token
    }

    pub fn unregister(&self, token: Uuid) {
        self.sessions.remove(&token);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Notifier for NotificationHub {
    fn broadcast(&self, payload: &Value) -> Result<(), AppError> {
        let text = serde_json::to_string(payload).map_err(|err| {
            AppError::internal(
                ErrorCode::InternalError,
                "Failed to serialize notification",
                err,
            )
        })?;
        let message = Push(Arc::from(text));

        let mut dropped = 0usize;
        for session in self.sessions.iter() {
            if session.value().try_send(message.clone()).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!(dropped, "Notification not delivered to some sessions");
        }
        Ok(())
    }
}
