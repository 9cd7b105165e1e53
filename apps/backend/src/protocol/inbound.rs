//! Decoding of bus messages into typed coordinator events.
//!
//! This is the only place that knows which wire topic means what. Anything
//! that fails here is reported as a `DomainError` and never reaches the
//! coordinator.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use xxhash_rust::xxh3::xxh3_64;

use super::status::RawStatus;
use super::topics::Topic;
use crate::domain::{
    Confirmation, GameStatus, Move, MoveKind, MoveMeta, PromotionPiece, RookHop, Side,
    SpecialMove, Square, STARTING_POSITION,
};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub from: Square,
    pub to: Square,
    pub reason: String,
    pub physical: bool,
}

/// Summary of a `state/update` we (or a peer) published.
#[derive(Debug, Clone, PartialEq)]
pub struct StateEcho {
    pub digest: u64,
    pub moves: Option<usize>,
    pub turn: Option<String>,
    pub game_status: Option<String>,
    /// Start position with an empty history.
    pub is_reset: bool,
}

/// Summary of a `log/update`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEcho {
    pub digest: u64,
    pub moves: Option<usize>,
    pub last_move: Option<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    PhysicalMove(Move),
    WebMove(Move),
    AiMove(Confirmation),
    MoveConfirmed(Confirmation),
    MoveRejected(Rejection),
    PhysicalStatus(RawStatus),
    EngineStatus(RawStatus),
    StateEcho(StateEcho),
    LogEcho(LogEcho),
    PossibleMovesRequest { position: Square },
    PossibleMovesResponse { position: String, moves: Value },
    ResetRequested,
    ResetConfirmed { fen: String },
    QueuedAiRequest { fen: String },
    QueuedUiNotice(Value),
}

impl BusEvent {
    pub fn decode(topic: &str, payload: &str) -> Result<Self, DomainError> {
        let topic =
            Topic::parse(topic).ok_or_else(|| DomainError::UnknownTopic(topic.to_string()))?;

        match topic {
            Topic::MovePlayer => Ok(BusEvent::PhysicalMove(parse::<ProposalWire>(payload)?.into_move()?)),
            Topic::MoveWeb => Ok(BusEvent::WebMove(parse::<ProposalWire>(payload)?.into_move()?)),
            Topic::MoveAi => Ok(BusEvent::AiMove(
                parse::<EngineMoveWire>(payload)?.into_confirmation(false)?,
            )),
            Topic::EngineMoveConfirmed => {
                let wire = parse::<EngineMoveWire>(payload)?;
                let physical = wire.physical;
                Ok(BusEvent::MoveConfirmed(wire.into_confirmation(physical)?))
            }
            Topic::EngineMoveRejected => {
                let wire = parse::<RejectionWire>(payload)?;
                Ok(BusEvent::MoveRejected(Rejection {
                    from: required_square(wire.from, "from")?,
                    to: required_square(wire.to, "to")?,
                    reason: wire.reason.ok_or_else(|| DomainError::missing("reason"))?,
                    physical: wire.physical,
                }))
            }
            Topic::StatusRaspi => Ok(BusEvent::PhysicalStatus(RawStatus::classify(payload))),
            Topic::StatusEngine => Ok(BusEvent::EngineStatus(RawStatus::classify(payload))),
            Topic::StateUpdate => Ok(BusEvent::StateEcho(state_echo(payload)?)),
            Topic::LogUpdate => Ok(BusEvent::LogEcho(log_echo(payload)?)),
            Topic::PossibleMovesRequest => {
                let wire = parse::<PositionWire>(payload)?;
                Ok(BusEvent::PossibleMovesRequest {
                    position: required_square(wire.position, "position")?,
                })
            }
            Topic::PossibleMovesResponse => {
                let wire = parse::<PossibleMovesWire>(payload)?;
                Ok(BusEvent::PossibleMovesResponse {
                    position: wire.position.ok_or_else(|| DomainError::missing("position"))?,
                    moves: wire.moves.ok_or_else(|| DomainError::missing("moves"))?,
                })
            }
            Topic::EngineResetConfirmed => {
                let wire = parse::<TypedFenWire>(payload)?;
                Ok(BusEvent::ResetConfirmed {
                    fen: wire.expect_type("reset_confirmed")?,
                })
            }
            Topic::InternalRequestAiMove => {
                let wire = parse::<TypedFenWire>(payload)?;
                Ok(BusEvent::QueuedAiRequest {
                    fen: wire.expect_type("request_ai_move")?,
                })
            }
            Topic::InternalPendingUiNotification => {
                let value = parse::<Value>(payload)?;
                match value.get("type").and_then(Value::as_str) {
                    Some(_) => Ok(BusEvent::QueuedUiNotice(value)),
                    None => Err(DomainError::missing("type")),
                }
            }
            Topic::ControlRestart => Ok(BusEvent::ResetRequested),
            Topic::MoveEngine
            | Topic::MoveRaspi
            | Topic::MoveRaspiRejected
            | Topic::ControlRestartExternal
            | Topic::EnginePossibleMovesRequest => Err(DomainError::UnknownTopic(topic.to_string())),
        }
    }
}

fn parse<T: DeserializeOwned>(payload: &str) -> Result<T, DomainError> {
    serde_json::from_str(payload).map_err(|err| DomainError::invalid_json(&err))
}

fn required_square(raw: Option<String>, field: &'static str) -> Result<Square, DomainError> {
    Square::parse(&raw.ok_or_else(|| DomainError::missing(field))?)
}

fn promotion(raw: Option<String>) -> Result<Option<PromotionPiece>, DomainError> {
    raw.as_deref().map(PromotionPiece::parse).transpose()
}

#[derive(Deserialize)]
struct ProposalWire {
    from: Option<String>,
    to: Option<String>,
    special_move: Option<SpecialMove>,
    promotion_piece: Option<String>,
    available_pieces: Option<Value>,
    captured_piece: Option<String>,
}

impl ProposalWire {
    fn into_move(self) -> Result<Move, DomainError> {
        Ok(Move {
            from: required_square(self.from, "from")?,
            to: required_square(self.to, "to")?,
            kind: MoveKind::classify(
                self.special_move,
                promotion(self.promotion_piece)?,
                self.captured_piece,
                None,
            ),
            meta: MoveMeta {
                notation: None,
                gives_check: false,
                available_pieces: self.available_pieces,
            },
        })
    }
}

#[derive(Deserialize)]
struct EngineMoveWire {
    from: Option<String>,
    to: Option<String>,
    fen: Option<String>,
    next_player: Option<String>,
    #[serde(default)]
    physical: bool,
    special_move: Option<SpecialMove>,
    promotion_piece: Option<String>,
    captured_piece: Option<String>,
    additional_moves: Option<Vec<RookHop>>,
    notation: Option<String>,
    #[serde(default)]
    gives_check: bool,
    game_status: Option<String>,
    winner: Option<String>,
}

impl EngineMoveWire {
    fn into_confirmation(self, physical: bool) -> Result<Confirmation, DomainError> {
        let from = required_square(self.from, "from")?;
        let to = required_square(self.to, "to")?;
        let fen = self.fen.ok_or_else(|| DomainError::missing("fen"))?;
        let next_turn: Side = self
            .next_player
            .ok_or_else(|| DomainError::missing("next_player"))?
            .parse()?;
        let rook = self.additional_moves.and_then(|hops| hops.into_iter().next());

        Ok(Confirmation {
            mv: Move {
                from,
                to,
                kind: MoveKind::classify(
                    self.special_move,
                    promotion(self.promotion_piece)?,
                    self.captured_piece,
                    rook,
                ),
                meta: MoveMeta {
                    notation: self.notation,
                    gives_check: self.gives_check,
                    available_pieces: None,
                },
            },
            fen,
            next_turn,
            physical,
            game_status: self.game_status.as_deref().map(GameStatus::from_wire),
            winner: self.winner.and_then(|w| w.parse().ok()),
        })
    }
}

#[derive(Deserialize)]
struct RejectionWire {
    from: Option<String>,
    to: Option<String>,
    reason: Option<String>,
    #[serde(default)]
    physical: bool,
}

#[derive(Deserialize)]
struct PositionWire {
    position: Option<String>,
}

#[derive(Deserialize)]
struct PossibleMovesWire {
    position: Option<String>,
    moves: Option<Value>,
}

#[derive(Deserialize)]
struct TypedFenWire {
    #[serde(rename = "type")]
    kind: Option<String>,
    fen: Option<String>,
}

impl TypedFenWire {
    fn expect_type(self, expected: &str) -> Result<String, DomainError> {
        match self.kind.as_deref() {
            Some(kind) if kind == expected => {}
            Some(other) => {
                return Err(DomainError::validation(
                    ValidationKind::Other("type".into()),
                    format!("expected type `{expected}`, got `{other}`"),
                ))
            }
            None => return Err(DomainError::missing("type")),
        }
        self.fen.ok_or_else(|| DomainError::missing("fen"))
    }
}

fn state_echo(payload: &str) -> Result<StateEcho, DomainError> {
    let value = parse::<Value>(payload)?;
    let moves = value.get("moves").and_then(Value::as_array);
    let fen = value.get("fen").and_then(Value::as_str);
    Ok(StateEcho {
        digest: xxh3_64(payload.as_bytes()),
        moves: moves.map(Vec::len),
        turn: value.get("turn").and_then(Value::as_str).map(str::to_string),
        game_status: value
            .get("game_status")
            .and_then(Value::as_str)
            .map(str::to_string),
        is_reset: fen == Some(STARTING_POSITION) && moves.is_some_and(|m| m.is_empty()),
    })
}

fn log_echo(payload: &str) -> Result<LogEcho, DomainError> {
    let value = parse::<Value>(payload)?;
    let moves = value.get("moves").and_then(Value::as_array);
    let last_move = moves.and_then(|m| m.last()).and_then(|last| {
        let from = last.get("from")?.as_str()?;
        let to = last.get("to")?.as_str()?;
        Some((from.to_string(), to.to_string()))
    });
    Ok(LogEcho {
        digest: xxh3_64(payload.as_bytes()),
        moves: moves.map(Vec::len),
        last_move,
    })
}
