use tracing::{info, warn};

use super::MoveCoordinator;
use crate::domain::Move;
use crate::protocol::outbound::ValidationRequest;
use crate::protocol::{BusMessage, Notification, Outbound};

impl MoveCoordinator {
    /// A move made on the board (`physical`) or in the web UI.
    ///
    /// Recorded as pending and sent to the engine for validation. Discarded
    /// while the board is still undoing an illegal move.
    pub(super) fn handle_proposal(&mut self, mv: Move, physical: bool) -> Vec<Outbound> {
        if self.flow.is_reverting() {
            warn!(
                from = %mv.from,
                to = %mv.to,
                physical,
                "Move discarded while illegal move revert is pending"
            );
            return Vec::new();
        }

        info!(from = %mv.from, to = %mv.to, physical, "Move proposed");

        self.state.add_pending_move(mv.clone(), physical);
        let request = ValidationRequest::new(mv.clone(), self.state.position(), physical);

        vec![
            Outbound::Publish(BusMessage::Validation(request)),
            Outbound::Broadcast(Notification::MovePending {
                mv,
                physical,
                state: self.state.snapshot(),
            }),
        ]
    }
}
