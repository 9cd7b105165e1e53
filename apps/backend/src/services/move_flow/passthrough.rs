//! Stateless forwarding and echo bookkeeping.

use serde_json::Value;
use tracing::{debug, info};

use super::MoveCoordinator;
use crate::domain::Square;
use crate::protocol::outbound::PossibleMovesQuery;
use crate::protocol::{BusMessage, LogEcho, Notification, Outbound, StateEcho};

impl MoveCoordinator {
    pub(super) fn handle_possible_moves_request(&mut self, position: Square) -> Vec<Outbound> {
        info!(%position, "Forwarding possible moves request to engine");
        vec![Outbound::Publish(BusMessage::PossibleMoves(PossibleMovesQuery {
            position,
            fen: Some(self.state.position().to_string()),
        }))]
    }

    pub(super) fn handle_possible_moves_response(
        &mut self,
        position: String,
        moves: Value,
    ) -> Vec<Outbound> {
        let count = moves.as_array().map(Vec::len);
        info!(%position, ?count, "Forwarding possible moves to UI");
        vec![Outbound::Broadcast(Notification::PossibleMoves {
            position,
            moves,
        })]
    }

    pub(super) fn handle_state_echo(&mut self, echo: StateEcho) -> Vec<Outbound> {
        if self.last_state_echo.replace(echo.digest) == Some(echo.digest) {
            debug!("Duplicate state update ignored");
            return Vec::new();
        }
        if echo.is_reset {
            info!("State update shows a reset board");
        } else {
            info!(
                moves = ?echo.moves,
                turn = ?echo.turn,
                game_status = ?echo.game_status,
                "State update observed"
            );
        }
        Vec::new()
    }

    pub(super) fn handle_log_echo(&mut self, echo: LogEcho) -> Vec<Outbound> {
        if self.last_log_echo.replace(echo.digest) == Some(echo.digest) {
            debug!("Duplicate log update ignored");
            return Vec::new();
        }
        match &echo.last_move {
            Some((from, to)) => info!(moves = ?echo.moves, %from, %to, "Log update observed"),
            None => info!(moves = ?echo.moves, "Log update observed"),
        }
        Vec::new()
    }
}
