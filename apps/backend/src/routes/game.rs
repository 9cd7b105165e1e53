//! Game state routes: `/state`, `/log`, `/restart`.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::info;

use crate::domain::{GameSnapshot, HistoryEntry};
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Serialize)]
struct LogResponse {
    moves: Vec<HistoryEntry>,
}

#[derive(Serialize)]
struct RestartResponse {
    success: bool,
    status: &'static str,
    message: &'static str,
    state: GameSnapshot,
}

/// GET /state
async fn get_state(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let snapshot = app_state.coordinator.snapshot().await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// GET /log
async fn get_log(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let snapshot = app_state.coordinator.snapshot().await?;
    Ok(HttpResponse::Ok().json(LogResponse {
        moves: snapshot.moves,
    }))
}

/// POST /restart
///
/// Resets through the coordinator so the reset is ordered with bus traffic.
/// The returned state is the provisional post-reset snapshot; the engine's
/// acknowledgment arrives later on the bus.
async fn restart(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let state = app_state.coordinator.reset().await?;
    info!("Game reset requested over HTTP");
    Ok(HttpResponse::Ok().json(RestartResponse {
        success: true,
        status: "reset",
        message: "Game reset successfully",
        state,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/state", web::get().to(get_state))
        .route("/log", web::get().to(get_log))
        .route("/restart", web::post().to(restart));
}
