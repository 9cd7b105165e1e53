use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use chessbridge::bus::{run_subscriber, BusPublisher, RedisBus};
use chessbridge::config::AppConfig;
use chessbridge::middleware::cors::cors_middleware;
use chessbridge::middleware::request_trace::RequestTrace;
use chessbridge::middleware::structured_logger::StructuredLogger;
use chessbridge::routes;
use chessbridge::services::{spawn_coordinator, MoveCoordinator};
use chessbridge::state::app_state::AppState;
use chessbridge::ws::{NotificationHub, Notifier};
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker-compose env_file, or `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let bus = match RedisBus::connect(&config.redis_url).await {
        Ok(bus) => bus,
        Err(e) => {
            eprintln!("❌ Failed to connect to the message bus: {e}");
            std::process::exit(1);
        }
    };
    info!(redis_url = %config.redis_url, "Bus connected");

    let hub = Arc::new(NotificationHub::new());
    let publisher: Arc<dyn BusPublisher> = bus.clone();
    let notifier: Arc<dyn Notifier> = hub.clone();
    let (coordinator, _coordinator_task) = spawn_coordinator(
        MoveCoordinator::new(config.engine_side),
        publisher.clone(),
        notifier,
    );

    let subscriber_handle = coordinator.clone();
    let client = bus.client();
    tokio::spawn(async move {
        if let Err(e) = run_subscriber(client, subscriber_handle).await {
            error!(error = %e, "Bus subscriber gave up; shutting down");
            std::process::exit(1);
        }
    });

    let host = config.host.clone();
    let port = config.port;
    println!("🚀 Starting chessbridge on http://{host}:{port}");

    let data = web::Data::new(AppState::new(coordinator, publisher, hub, config));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
