//! The game state store.
//!
//! Pure bookkeeping over position, history and provisional moves. The
//! coordinator is the only caller; nothing here performs I/O.

use serde::Serialize;

use super::moves::{GameStatus, Move, Side, Square, STARTING_POSITION};

/// A move awaiting the engine's verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingMove {
    #[serde(flatten)]
    pub mv: Move,
    pub physical: bool,
}

/// A confirmed move as recorded in the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub mv: Move,
    /// Position after the move.
    pub fen: String,
    /// Side that made the move.
    pub player: Side,
    /// Unix seconds.
    pub timestamp: i64,
    /// 1-based half-move number within the game.
    pub ply: u32,
    pub physical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_status: Option<GameStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
}

/// Engine verdict for a move, authoritative for position and turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub mv: Move,
    pub fen: String,
    pub next_turn: Side,
    pub physical: bool,
    pub game_status: Option<GameStatus>,
    pub winner: Option<Side>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmOutcome {
    /// The move with any pending metadata folded in.
    pub mv: Move,
    /// False when an identical entry was already in the history.
    pub appended: bool,
    /// Whether a matching pending move was found and removed.
    pub matched_pending: bool,
}

/// Read-only view published as `state/update` and served on `GET /state`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub fen: String,
    pub moves: Vec<HistoryEntry>,
    pub turn: Side,
    pub pending_moves: Vec<PendingMove>,
    pub game_status: GameStatus,
    pub winner: Option<Side>,
    pub game_ended: bool,
    pub in_check: bool,
    pub check_player: Option<Side>,
}

#[derive(Debug, Clone)]
pub struct GameState {
    position: String,
    history: Vec<HistoryEntry>,
    pending: Vec<PendingMove>,
    turn: Side,
    status: GameStatus,
    winner: Option<Side>,
    check: Option<Side>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            position: STARTING_POSITION.to_string(),
            history: Vec::new(),
            pending: Vec::new(),
            turn: Side::White,
            status: GameStatus::Playing,
            winner: None,
            check: None,
        }
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn pending(&self) -> &[PendingMove] {
        &self.pending
    }

    pub fn check(&self) -> Option<Side> {
        self.check
    }

    pub fn add_pending_move(&mut self, mv: Move, physical: bool) {
        self.pending.push(PendingMove { mv, physical });
    }

    pub fn confirm_move(&mut self, confirmation: Confirmation, timestamp: i64) -> ConfirmOutcome {
        let Confirmation {
            mv,
            fen,
            next_turn,
            physical,
            game_status,
            winner,
        } = confirmation;

        let matched = self
            .pending
            .iter()
            .position(|p| p.mv.same_squares(&mv.from, &mv.to))
            .map(|index| self.pending.remove(index));

        let mv = match &matched {
            Some(pending) => mv.folded_with(&pending.mv),
            None => mv,
        };

        let mover = next_turn.opponent();
        let duplicate = self.history.iter().any(|entry| {
            entry.mv.same_squares(&mv.from, &mv.to) && entry.fen == fen && entry.player == mover
        });
        if duplicate {
            // A redelivered verdict: the recorded entry already moved the game on.
            return ConfirmOutcome {
                mv,
                appended: false,
                matched_pending: matched.is_some(),
            };
        }

        self.history.push(HistoryEntry {
            mv: mv.clone(),
            fen: fen.clone(),
            player: mover,
            timestamp,
            ply: self.history.len() as u32 + 1,
            physical,
            game_status,
            winner,
        });

        self.position = fen;
        self.turn = next_turn;

        if let Some(status) = game_status {
            self.status = status;
            if winner.is_some() {
                self.winner = winner;
            }
        }

        self.check = mv.meta.gives_check.then_some(next_turn);

        ConfirmOutcome {
            mv,
            appended: true,
            matched_pending: matched.is_some(),
        }
    }

    /// Drop every pending move on these squares. Returns how many were removed.
    pub fn reject_move(&mut self, from: &Square, to: &Square) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !p.mv.same_squares(from, to));
        before - self.pending.len()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Out-of-band correction from the engine. Clears provisional moves.
    pub fn set_position(&mut self, fen: impl Into<String>) {
        let fen = fen.into();
        if let Some(side) = Side::from_fen(&fen) {
            self.turn = side;
        }
        self.position = fen;
        self.pending.clear();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            fen: self.position.clone(),
            moves: self.history.clone(),
            turn: self.turn,
            pending_moves: self.pending.clone(),
            game_status: self.status,
            winner: self.winner,
            game_ended: self.status.is_terminal(),
            in_check: self.check.is_some(),
            check_player: self.check,
        }
    }
}
