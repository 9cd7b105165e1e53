//! Move reconciliation: the single authoritative mutator of game state.
//!
//! `MoveCoordinator::handle` takes one decoded bus event and returns the
//! ordered side effects it implies. It never performs I/O itself; the
//! event loop executes the returned `Outbound`s.

mod dedup;
mod engine;
pub mod flow_control;
mod passthrough;
mod proposals;
mod reset;
mod status;

use std::time::Instant;

use time::OffsetDateTime;

pub use dedup::{ConfirmationWindow, DUPLICATE_WINDOW, EVICT_AFTER};
pub use flow_control::{FlowAction, FlowControl, FlowMode, PhysicalStatus, QueuedNotice};

use crate::domain::{GameSnapshot, GameState, Side};
use crate::protocol::outbound::LogUpdate;
use crate::protocol::{BusEvent, BusMessage, Outbound};

#[derive(Debug)]
pub struct MoveCoordinator {
    state: GameState,
    flow: FlowControl,
    confirmations: ConfirmationWindow,
    engine_side: Side,
    reset_pending: bool,
    last_state_echo: Option<u64>,
    last_log_echo: Option<u64>,
}

impl MoveCoordinator {
    pub fn new(engine_side: Side) -> Self {
        Self {
            state: GameState::new(),
            flow: FlowControl::new(),
            confirmations: ConfirmationWindow::new(),
            engine_side,
            reset_pending: false,
            last_state_echo: None,
            last_log_echo: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn flow(&self) -> &FlowControl {
        &self.flow
    }

    pub fn engine_side(&self) -> Side {
        self.engine_side
    }

    /// A reset was requested and the engine has not acknowledged it yet.
    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn handle(&mut self, event: BusEvent, now: Instant) -> Vec<Outbound> {
        match event {
            BusEvent::PhysicalMove(mv) => self.handle_proposal(mv, true),
            BusEvent::WebMove(mv) => self.handle_proposal(mv, false),
            BusEvent::AiMove(confirmation) => self.handle_ai_move(confirmation),
            BusEvent::MoveConfirmed(confirmation) => self.handle_move_confirmed(confirmation, now),
            BusEvent::MoveRejected(rejection) => self.handle_move_rejected(rejection),
            BusEvent::PhysicalStatus(raw) => self.handle_physical_status(&raw),
            BusEvent::EngineStatus(raw) => self.handle_engine_status(&raw),
            BusEvent::StateEcho(echo) => self.handle_state_echo(echo),
            BusEvent::LogEcho(echo) => self.handle_log_echo(echo),
            BusEvent::PossibleMovesRequest { position } => {
                self.handle_possible_moves_request(position)
            }
            BusEvent::PossibleMovesResponse { position, moves } => {
                self.handle_possible_moves_response(position, moves)
            }
            BusEvent::ResetRequested => self.handle_game_reset(),
            BusEvent::ResetConfirmed { fen } => self.handle_reset_confirmed(fen),
            BusEvent::QueuedAiRequest { fen } => self.handle_queued_ai_request(fen),
            BusEvent::QueuedUiNotice(value) => self.handle_queued_ui_notice(value),
        }
    }

    /// Full state followed by the move log.
    fn push_state_and_log(&self, out: &mut Vec<Outbound>) {
        let snapshot = self.state.snapshot();
        let moves = snapshot.moves.clone();
        out.push(Outbound::Publish(BusMessage::State(snapshot)));
        out.push(Outbound::Publish(BusMessage::Log(LogUpdate {
            moves,
            reset: None,
            timestamp: None,
        })));
    }
}

pub(crate) fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
