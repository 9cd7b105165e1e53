//! Redis pub/sub transport. Topic names are used as channel names.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, PubSub};
use redis::{AsyncCommands, Client};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use super::BusPublisher;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::protocol::{BusEvent, Topic};
use crate::services::event_loop::CoordinatorHandle;

// Publisher retry configuration
const PUBLISHER_MAX_ATTEMPTS: u32 = 3;
const PUBLISHER_INITIAL_RETRY_DELAY_MS: u64 = 50;
const PUBLISHER_MAX_RETRY_DELAY_MS: u64 = 200;

/// Delay before the single reconnect attempt after a transport failure.
pub const SUBSCRIBER_RETRY_DELAY: Duration = Duration::from_secs(5);
/// Consecutive failures after which the subscriber gives up.
pub const SUBSCRIBER_MAX_CONSECUTIVE_FAILURES: u32 = 2;

pub struct RedisBus {
    client: Client,
    publisher: Mutex<ConnectionManager>,
}

impl RedisBus {
    pub async fn connect(redis_url: &str) -> Result<Arc<Self>, AppError> {
        let client = Client::open(redis_url).map_err(|err| AppError::Config {
            detail: format!("Invalid REDIS_URL: {err}"),
            source: Box::new(err),
        })?;

        let manager = ConnectionManager::new(client.clone())
            .await
            .map_err(|err| AppError::bus_unavailable("Unable to initialize Redis connection manager", err))?;

        Ok(Arc::new(Self {
            client,
            publisher: Mutex::new(manager),
        }))
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }
}

#[async_trait]
impl BusPublisher for RedisBus {
    async fn publish(&self, topic: Topic, payload: String) -> Result<(), AppError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let publish_res = {
                let mut publisher = self.publisher.lock().await;
                publisher
                    .publish::<_, _, ()>(topic.as_str(), payload.as_str())
                    .await
            };

            match publish_res {
                Ok(()) => {
                    debug!(topic = %topic, "Published to bus");
                    return Ok(());
                }
                Err(err) => {
                    let app_err = AppError::bus_unavailable(
                        format!("Failed to publish to {topic}"),
                        err,
                    );

                    if attempt >= PUBLISHER_MAX_ATTEMPTS || !is_transient_error(&app_err) {
                        return Err(app_err);
                    }

                    let delay_ms = PUBLISHER_INITIAL_RETRY_DELAY_MS
                        .saturating_mul(2_u64.pow(attempt - 1))
                        .min(PUBLISHER_MAX_RETRY_DELAY_MS);
                    warn!(
                        error = %app_err,
                        topic = %topic,
                        attempt,
                        retry_delay_ms = delay_ms,
                        "Redis publish failed, retrying"
                    );
                    sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.publisher.lock().await;
        redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map(|_| ())
            .map_err(|err| AppError::bus_unavailable("Redis did not answer PING", err))
    }
}

pub(crate) fn is_transient_error(err: &AppError) -> bool {
    if let AppError::Config { .. } = err {
        return false;
    }

    let error_msg = err.to_string().to_lowercase();
    if error_msg.contains("authentication failed") || error_msg.contains("invalid redis_url") {
        return false;
    }

    if let Some(source) = StdError::source(err) {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
            match io_err.kind() {
                std::io::ErrorKind::PermissionDenied => return false,
                std::io::ErrorKind::Unsupported => return false,
                _ => {}
            }
        }
    }

    true
}

/// How a subscription session ended without a transport error.
enum SessionEnd {
    CoordinatorClosed,
}

/// Subscribe to every consumed topic and feed decoded events to the coordinator.
///
/// A transport failure is retried once after `SUBSCRIBER_RETRY_DELAY`; a
/// second consecutive failure is returned to the caller. A session that got
/// as far as subscribing resets the count. Returns `Ok` when the coordinator
/// shuts down.
pub async fn run_subscriber(client: Client, handle: CoordinatorHandle) -> Result<(), AppError> {
    let mut consecutive_failures = 0u32;

    loop {
        let mut subscribed = false;
        match run_session(&client, &handle, &mut subscribed).await {
            Ok(SessionEnd::CoordinatorClosed) => {
                info!("Coordinator closed, stopping bus subscriber");
                return Ok(());
            }
            Err(err) => {
                consecutive_failures = if subscribed { 1 } else { consecutive_failures + 1 };

                if consecutive_failures >= SUBSCRIBER_MAX_CONSECUTIVE_FAILURES {
                    error!(
                        error = %err,
                        consecutive_failures,
                        "Bus subscription failed again, giving up"
                    );
                    return Err(err);
                }

                warn!(
                    error = %err,
                    retry_delay_secs = SUBSCRIBER_RETRY_DELAY.as_secs(),
                    "Bus subscription failed, retrying"
                );
                sleep(SUBSCRIBER_RETRY_DELAY).await;
            }
        }
    }
}

async fn run_session(
    client: &Client,
    handle: &CoordinatorHandle,
    subscribed: &mut bool,
) -> Result<SessionEnd, AppError> {
    let conn_info = client.get_connection_info();

    let addr = match conn_info.addr().clone() {
        redis::ConnectionAddr::Tcp(host, port) => (host, port),
        _ => {
            return Err(AppError::Config {
                detail: "Only TCP protocol is supported for pubsub".to_string(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "Non-TCP protocol",
                )),
            });
        }
    };

    info!("Connecting to Redis for subscription at {}:{}", addr.0, addr.1);

    let stream = tokio::net::TcpStream::connect(addr)
        .await
        .map_err(|err| AppError::bus_unavailable("Failed to connect to Redis for subscription", err))?;

    let mut pubsub = PubSub::new(conn_info.redis_settings(), stream)
        .await
        .map_err(|err| AppError::bus_unavailable("Failed to create Redis pubsub", err))?;

    for topic in Topic::SUBSCRIBED {
        pubsub.subscribe(topic.as_str()).await.map_err(|err| {
            AppError::bus_unavailable(format!("Failed to subscribe to {topic}"), err)
        })?;
    }
    *subscribed = true;

    info!(topics = Topic::SUBSCRIBED.len(), "Bus subscription established");

    let mut messages = pubsub.into_on_message();
    while let Some(msg) = messages.next().await {
        let Ok(channel) = msg.get_channel::<String>() else {
            continue;
        };
        let Ok(payload) = msg.get_payload::<String>() else {
            warn!(channel = %channel, "Non-UTF-8 bus payload dropped");
            continue;
        };

        match BusEvent::decode(&channel, &payload) {
            Ok(event) => {
                if handle.dispatch(event).await.is_err() {
                    return Ok(SessionEnd::CoordinatorClosed);
                }
            }
            Err(err) => {
                warn!(channel = %channel, error = %err, "Malformed bus message dropped");
            }
        }
    }

    warn!("Redis subscription stream ended, connection lost");
    Err(AppError::internal(
        ErrorCode::BusUnavailable,
        "Redis subscription stream ended unexpectedly",
        std::io::Error::new(std::io::ErrorKind::ConnectionAborted, "Stream ended"),
    ))
}
