//! Move submission routes. Both only publish; the coordinator picks the
//! message up from the bus like any other producer's.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::bus::publish_message;
use crate::domain::{Move, MoveKind, MoveMeta, PromotionPiece, SpecialMove, Square};
use crate::error::AppError;
use crate::errors::DomainError;
use crate::extractors::ValidatedJson;
use crate::protocol::outbound::PossibleMovesQuery;
use crate::protocol::BusMessage;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    from: Option<String>,
    to: Option<String>,
    special_move: Option<SpecialMove>,
    promotion_piece: Option<String>,
}

impl MoveRequest {
    fn into_move(self) -> Result<Move, DomainError> {
        let from = Square::parse(&self.from.ok_or_else(|| DomainError::missing("from"))?)?;
        let to = Square::parse(&self.to.ok_or_else(|| DomainError::missing("to"))?)?;
        let promotion = self
            .promotion_piece
            .as_deref()
            .map(PromotionPiece::parse)
            .transpose()?;
        Ok(Move {
            from,
            to,
            kind: MoveKind::classify(self.special_move, promotion, None, None),
            meta: MoveMeta::default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PossibleMovesRequest {
    position: Option<String>,
}

/// POST /move
async fn submit_move(
    body: ValidatedJson<MoveRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mv = body.into_inner().into_move()?;
    info!(from = %mv.from, to = %mv.to, "Web move submitted");
    publish_message(app_state.publisher.as_ref(), &BusMessage::WebMove(mv)).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

/// POST /possible-moves
async fn request_possible_moves(
    body: ValidatedJson<PossibleMovesRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let raw = body
        .into_inner()
        .position
        .ok_or_else(|| DomainError::missing("position"))?;
    let position = Square::parse(&raw)?;
    let message = BusMessage::PossibleMovesAsk(PossibleMovesQuery {
        position,
        fen: None,
    });
    publish_message(app_state.publisher.as_ref(), &message).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "request_sent" })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/move", web::post().to(submit_move))
        .route("/possible-moves", web::post().to(request_possible_moves));
}
