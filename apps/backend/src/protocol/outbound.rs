//! Messages the coordinator sends: bus publishes and UI broadcasts.

use serde::Serialize;
use serde_json::Value;

use super::status::NormalizedStatus;
use super::topics::Topic;
use crate::domain::{GameSnapshot, GameStatus, HistoryEntry, Move, PhysicalInstruction, Side, Square};

/// `move/engine` legality check for a proposed move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationRequest {
    #[serde(flatten)]
    pub mv: Move,
    pub current_fen: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub physical: bool,
}

impl ValidationRequest {
    pub fn new(mv: Move, current_fen: impl Into<String>, physical: bool) -> Self {
        Self {
            mv,
            current_fen: current_fen.into(),
            kind: "move_validation",
            physical,
        }
    }
}

/// `move/engine` request for the engine to play its move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiMoveRequest {
    pub fen: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl AiMoveRequest {
    pub fn new(fen: impl Into<String>) -> Self {
        Self {
            fen: fen.into(),
            kind: "request_ai_move",
        }
    }
}

/// `move/raspi/rejected`: put the piece back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevertInstruction {
    pub from: Square,
    pub to: Square,
    pub reason: String,
    pub action: &'static str,
    pub fen: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogUpdate {
    pub moves: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetBoard {
    pub fen: String,
    pub command: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PossibleMovesQuery {
    pub position: Square,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BusMessage {
    Validation(ValidationRequest),
    AiMove(AiMoveRequest),
    Instruction(PhysicalInstruction),
    Revert(RevertInstruction),
    State(GameSnapshot),
    Log(LogUpdate),
    ResetBoard(ResetBoard),
    /// Enriched request forwarded to the engine.
    PossibleMoves(PossibleMovesQuery),
    /// Move entered in the web UI, published by the HTTP layer.
    WebMove(Move),
    /// Possible-moves question from the web UI, published by the HTTP layer.
    PossibleMovesAsk(PossibleMovesQuery),
}

impl BusMessage {
    pub fn topic(&self) -> Topic {
        match self {
            BusMessage::Validation(_) | BusMessage::AiMove(_) => Topic::MoveEngine,
            BusMessage::Instruction(_) => Topic::MoveRaspi,
            BusMessage::Revert(_) => Topic::MoveRaspiRejected,
            BusMessage::State(_) => Topic::StateUpdate,
            BusMessage::Log(_) => Topic::LogUpdate,
            BusMessage::ResetBoard(_) => Topic::ControlRestartExternal,
            BusMessage::PossibleMoves(_) => Topic::EnginePossibleMovesRequest,
            BusMessage::WebMove(_) => Topic::MoveWeb,
            BusMessage::PossibleMovesAsk(_) => Topic::PossibleMovesRequest,
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameOver {
    pub result: GameStatus,
    pub winner: Option<Side>,
    pub final_position: String,
    pub moves_count: usize,
}

impl GameOver {
    /// `Some` only once the snapshot shows a finished game.
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Option<Self> {
        snapshot.game_status.is_terminal().then(|| GameOver {
            result: snapshot.game_status,
            winner: snapshot.winner,
            final_position: snapshot.fen.clone(),
            moves_count: snapshot.moves.len(),
        })
    }
}

/// Pushed to every connected UI client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    MovePending {
        #[serde(rename = "move")]
        mv: Move,
        physical: bool,
        state: GameSnapshot,
    },
    MoveConfirmed {
        #[serde(rename = "move")]
        mv: Move,
        physical: bool,
        state: GameSnapshot,
    },
    MoveRejected {
        #[serde(rename = "move")]
        mv: Move,
        reason: String,
        physical: bool,
        state: GameSnapshot,
    },
    AiMoveExecuted {
        #[serde(rename = "move")]
        mv: Move,
        state: GameSnapshot,
        #[serde(skip_serializing_if = "Option::is_none")]
        game_over: Option<GameOver>,
    },
    PossibleMoves {
        position: String,
        moves: Value,
    },
    RaspiStatus {
        data: NormalizedStatus,
        timestamp: i64,
    },
    EngineStatus {
        data: NormalizedStatus,
        timestamp: i64,
    },
    GameReset {
        state: GameSnapshot,
        confirmed: bool,
    },
    RevertCompleted {
        message: String,
        timestamp: i64,
        status: &'static str,
    },
    GameOver(GameOver),
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::MovePending { .. } => "move_pending",
            Notification::MoveConfirmed { .. } => "move_confirmed",
            Notification::MoveRejected { .. } => "move_rejected",
            Notification::AiMoveExecuted { .. } => "ai_move_executed",
            Notification::PossibleMoves { .. } => "possible_moves",
            Notification::RaspiStatus { .. } => "raspi_status",
            Notification::EngineStatus { .. } => "engine_status",
            Notification::GameReset { .. } => "game_reset",
            Notification::RevertCompleted { .. } => "revert_completed",
            Notification::GameOver(_) => "game_over",
        }
    }
}

/// One side effect requested by the coordinator, executed in order by the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Publish(BusMessage),
    Broadcast(Notification),
    /// A notification that arrived as opaque JSON and is forwarded unchanged.
    Relay(Value),
}

impl Outbound {
    /// `type` of the broadcast, if this is one.
    pub fn broadcast_kind(&self) -> Option<&str> {
        match self {
            Outbound::Broadcast(n) => Some(n.kind()),
            Outbound::Relay(value) => value.get("type").and_then(Value::as_str),
            Outbound::Publish(_) => None,
        }
    }

    pub fn published_topic(&self) -> Option<Topic> {
        match self {
            Outbound::Publish(msg) => Some(msg.topic()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::GameState;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    #[test]
    fn validation_request_wire_shape() {
        let msg = BusMessage::Validation(ValidationRequest::new(
            Move::plain(sq("e2"), sq("e4")),
            "start",
            true,
        ));
        assert_eq!(msg.topic(), Topic::MoveEngine);
        let value: Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "from": "e2",
                "to": "e4",
                "current_fen": "start",
                "type": "move_validation",
                "physical": true
            })
        );
    }

    #[test]
    fn ai_request_and_reset_shapes() {
        let ai = BusMessage::AiMove(AiMoveRequest::new("fen"));
        assert_eq!(
            serde_json::to_value(&ai).unwrap(),
            json!({"fen": "fen", "type": "request_ai_move"})
        );
        let reset = BusMessage::ResetBoard(ResetBoard {
            fen: "fen".into(),
            command: "reset_board",
        });
        assert_eq!(reset.topic(), Topic::ControlRestartExternal);
        assert_eq!(reset.encode().unwrap(), r#"{"fen":"fen","command":"reset_board"}"#);
    }

    #[test]
    fn notifications_are_tagged_by_type() {
        let state = GameState::new().snapshot();
        let pending = Notification::MovePending {
            mv: Move::plain(sq("e2"), sq("e4")),
            physical: false,
            state: state.clone(),
        };
        let value = serde_json::to_value(&pending).unwrap();
        assert_eq!(value["type"], pending.kind());
        assert_eq!(value["move"]["from"], "e2");
        assert_eq!(value["state"]["fen"], state.fen);

        let over = Notification::GameOver(GameOver {
            result: GameStatus::Stalemate,
            winner: None,
            final_position: "x".into(),
            moves_count: 3,
        });
        assert_eq!(
            serde_json::to_value(&over).unwrap(),
            json!({
                "type": "game_over",
                "result": "stalemate",
                "winner": null,
                "final_position": "x",
                "moves_count": 3
            })
        );
    }

    #[test]
    fn game_over_only_for_terminal_snapshots() {
        let mut snapshot = GameState::new().snapshot();
        assert!(GameOver::from_snapshot(&snapshot).is_none());
        snapshot.game_status = GameStatus::Checkmate;
        snapshot.winner = Some(Side::Black);
        let over = GameOver::from_snapshot(&snapshot).unwrap();
        assert_eq!(over.winner, Some(Side::Black));
    }
}
