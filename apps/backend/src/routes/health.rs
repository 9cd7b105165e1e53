use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::services::health::{self, HealthProbes};
use crate::state::app_state::AppState;

/// Liveness only.
async fn liveness() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("ok"))
}

async fn report(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let config = &app_state.config;
    let report = health::check(HealthProbes {
        publisher: app_state.publisher.as_ref(),
        coordinator: &app_state.coordinator,
        ws_sessions: app_state.hub.session_count(),
        http: &app_state.http,
        physical_board_url: config.physical_board_health_url.as_deref(),
        engine_url: config.engine_health_url.as_deref(),
    })
    .await;
    Ok(HttpResponse::Ok().json(report))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(liveness))
        .route("/api/health", web::get().to(report));
}
