//! Component health report served on `/api/health`.

use std::future::Future;
use std::time::{Duration, Instant};

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::time::timeout;

use crate::bus::BusPublisher;
use crate::error::AppError;
use crate::services::event_loop::CoordinatorHandle;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
pub const COORDINATOR_TIMEOUT: Duration = Duration::from_secs(1);
/// Probes slower than this are reported as `warning`.
pub const SLOW_RESPONSE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ComponentHealth {
    fn noted(status: HealthStatus, note: impl Into<String>) -> Self {
        Self {
            status,
            response_time: None,
            note: Some(note.into()),
        }
    }

    /// Grade a finished probe by outcome and latency.
    pub fn from_probe(elapsed: Duration, outcome: Result<(), String>) -> Self {
        let response_time = Some(format!("{:.2}ms", elapsed.as_secs_f64() * 1000.0));
        match outcome {
            Ok(()) if elapsed > SLOW_RESPONSE => Self {
                status: HealthStatus::Warning,
                response_time,
                note: Some("slow response".to_string()),
            },
            Ok(()) => Self {
                status: HealthStatus::Healthy,
                response_time,
                note: None,
            },
            Err(note) => Self {
                status: HealthStatus::Error,
                response_time,
                note: Some(note),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub bus: ComponentHealth,
    pub notifier: ComponentHealth,
    pub coordinator: ComponentHealth,
    pub physical_board: ComponentHealth,
    pub chess_engine: ComponentHealth,
    pub overall_status: HealthStatus,
    pub timestamp: String,
    pub total_time: String,
}

pub struct HealthProbes<'a> {
    pub publisher: &'a dyn BusPublisher,
    pub coordinator: &'a CoordinatorHandle,
    pub ws_sessions: usize,
    pub http: &'a reqwest::Client,
    pub physical_board_url: Option<&'a str>,
    pub engine_url: Option<&'a str>,
}

pub async fn check(probes: HealthProbes<'_>) -> HealthReport {
    let started = Instant::now();

    let bus = timed(PROBE_TIMEOUT, probes.publisher.ping()).await;
    let coordinator = timed(COORDINATOR_TIMEOUT, async {
        probes.coordinator.snapshot().await.map(|_| ())
    })
    .await;
    let notifier = ComponentHealth::noted(
        HealthStatus::Healthy,
        format!("{} websocket session(s)", probes.ws_sessions),
    );
    let physical_board = http_probe(probes.http, probes.physical_board_url).await;
    let chess_engine = http_probe(probes.http, probes.engine_url).await;

    let overall_status = [
        &bus,
        &notifier,
        &coordinator,
        &physical_board,
        &chess_engine,
    ]
    .iter()
    .map(|c| c.status)
    .max()
    .unwrap_or(HealthStatus::Healthy);

    HealthReport {
        bus,
        notifier,
        coordinator,
        physical_board,
        chess_engine,
        overall_status,
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string()),
        total_time: format!("{:.2}ms", started.elapsed().as_secs_f64() * 1000.0),
    }
}

async fn timed<F>(limit: Duration, probe: F) -> ComponentHealth
where
    F: Future<Output = Result<(), AppError>>,
{
    let started = Instant::now();
    let outcome = match timeout(limit, probe).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(err.to_string()),
        Err(_) => Err(format!("no answer within {}ms", limit.as_millis())),
    };
    ComponentHealth::from_probe(started.elapsed(), outcome)
}

async fn http_probe(http: &reqwest::Client, base_url: Option<&str>) -> ComponentHealth {
    let Some(base_url) = base_url else {
        return ComponentHealth::noted(HealthStatus::Warning, "health endpoint not configured");
    };
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    let started = Instant::now();
    let outcome = match http.get(&url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) if response.status().is_success() => Ok(()),
        Ok(response) => Err(format!("HTTP {}", response.status().as_u16())),
        Err(err) if err.is_timeout() => {
            Err(format!("no answer within {}ms", PROBE_TIMEOUT.as_millis()))
        }
        Err(err) => Err(err.to_string()),
    };
    ComponentHealth::from_probe(started.elapsed(), outcome)
}
