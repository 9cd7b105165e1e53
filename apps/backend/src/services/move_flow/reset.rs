use tracing::{info, warn};

use super::{unix_now, MoveCoordinator};
use crate::domain::STARTING_POSITION;
use crate::protocol::outbound::{LogUpdate, ResetBoard};
use crate::protocol::{BusMessage, Notification, Outbound};

impl MoveCoordinator {
    /// Local reset. The engine's acknowledgment completes it.
    pub(super) fn handle_game_reset(&mut self) -> Vec<Outbound> {
        self.state.reset();
        self.flow.reset();
        self.confirmations.clear();
        self.reset_pending = true;

        info!("Game reset requested, waiting for engine acknowledgment");

        vec![
            Outbound::Publish(BusMessage::ResetBoard(ResetBoard {
                fen: STARTING_POSITION.to_string(),
                command: "reset_board",
            })),
            Outbound::Broadcast(Notification::GameReset {
                state: self.state.snapshot(),
                confirmed: false,
            }),
        ]
    }

    pub(super) fn handle_reset_confirmed(&mut self, fen: String) -> Vec<Outbound> {
        if !self.reset_pending {
            warn!(%fen, "Reset acknowledgment without a pending reset, applying anyway");
        }
        info!(old_fen = %self.state.position(), new_fen = %fen, "Engine acknowledged reset");

        self.state.reset();
        self.state.set_position(fen);
        self.reset_pending = false;

        let snapshot = self.state.snapshot();
        vec![
            Outbound::Publish(BusMessage::State(snapshot.clone())),
            Outbound::Publish(BusMessage::Log(LogUpdate {
                moves: Vec::new(),
                reset: Some(true),
                timestamp: Some(unix_now()),
            })),
            Outbound::Broadcast(Notification::GameReset {
                state: snapshot,
                confirmed: true,
            }),
        ]
    }
}
