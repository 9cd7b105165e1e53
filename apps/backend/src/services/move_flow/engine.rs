//! Engine verdicts: AI moves, confirmations and rejections.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::{unix_now, ConfirmationWindow, MoveCoordinator, QueuedNotice};
use crate::domain::{derive_instruction, Confirmation, Move};
use crate::protocol::outbound::{AiMoveRequest, GameOver, RevertInstruction};
use crate::protocol::{BusMessage, Notification, Outbound, Rejection};

impl MoveCoordinator {
    /// The engine played. Applied immediately; the UI hears about it once
    /// the board has reproduced the move.
    pub(super) fn handle_ai_move(&mut self, confirmation: Confirmation) -> Vec<Outbound> {
        let fen = confirmation.fen.clone();
        let next_turn = confirmation.next_turn;
        let outcome = self.state.confirm_move(confirmation, unix_now());
        if !outcome.appended {
            debug!(
                from = %outcome.mv.from,
                to = %outcome.mv.to,
                "AI move already recorded, ignoring"
            );
            return Vec::new();
        }

        info!(
            from = %outcome.mv.from,
            to = %outcome.mv.to,
            next_turn = %next_turn,
            "AI move applied"
        );

        let mut out = vec![Outbound::Publish(BusMessage::Instruction(
            derive_instruction(&outcome.mv, &fen, next_turn),
        ))];
        self.push_state_and_log(&mut out);

        let snapshot = self.state.snapshot();
        let notice = Notification::AiMoveExecuted {
            mv: outcome.mv,
            game_over: GameOver::from_snapshot(&snapshot),
            state: snapshot,
        };
        if self
            .flow
            .queue_ui_notice(QueuedNotice::Typed(notice))
            .is_some()
        {
            debug!("Replaced queued UI notification");
        }

        out
    }

    pub(super) fn handle_move_confirmed(
        &mut self,
        confirmation: Confirmation,
        now: Instant,
    ) -> Vec<Outbound> {
        let fingerprint = ConfirmationWindow::fingerprint(
            confirmation.mv.from.as_str(),
            confirmation.mv.to.as_str(),
            &confirmation.fen,
        );
        if !self.confirmations.admit(fingerprint, now) {
            debug!(
                from = %confirmation.mv.from,
                to = %confirmation.mv.to,
                "Duplicate confirmation ignored"
            );
            return Vec::new();
        }

        let fen = confirmation.fen.clone();
        let next_turn = confirmation.next_turn;
        let physical = confirmation.physical;
        let outcome = self.state.confirm_move(confirmation, unix_now());

        if !outcome.appended {
            debug!(
                from = %outcome.mv.from,
                to = %outcome.mv.to,
                "Confirmation already recorded, ignoring"
            );
            let mut out = Vec::new();
            if outcome.matched_pending {
                self.push_state_and_log(&mut out);
            }
            return out;
        }

        if !outcome.matched_pending {
            warn!(
                from = %outcome.mv.from,
                to = %outcome.mv.to,
                "Confirmation without a matching pending move"
            );
        }
        info!(
            from = %outcome.mv.from,
            to = %outcome.mv.to,
            physical,
            next_turn = %next_turn,
            "Move confirmed"
        );

        let mut out = Vec::new();
        if !physical {
            out.push(Outbound::Publish(BusMessage::Instruction(derive_instruction(
                &outcome.mv,
                &fen,
                next_turn,
            ))));
        }
        self.push_state_and_log(&mut out);

        let snapshot = self.state.snapshot();
        let game_over = GameOver::from_snapshot(&snapshot);
        let finished = game_over.is_some();
        if let Some(over) = game_over {
            out.push(Outbound::Broadcast(Notification::GameOver(over)));
        }
        out.push(Outbound::Broadcast(Notification::MoveConfirmed {
            mv: outcome.mv,
            physical,
            state: snapshot,
        }));

        if next_turn == self.engine_side
            && !finished
            && self.flow.queue_ai_request(AiMoveRequest::new(fen)).is_some()
        {
            debug!("Replaced queued AI move request");
        }

        out
    }

    pub(super) fn handle_move_rejected(&mut self, rejection: Rejection) -> Vec<Outbound> {
        let Rejection {
            from,
            to,
            reason,
            physical,
        } = rejection;

        let mv = self
            .state
            .pending()
            .iter()
            .find(|p| p.mv.same_squares(&from, &to))
            .map(|p| p.mv.clone())
            .unwrap_or_else(|| Move::plain(from.clone(), to.clone()));

        let removed = self.state.reject_move(&from, &to);
        info!(%from, %to, %reason, physical, removed, "Move rejected");

        let mut out = Vec::new();
        if physical {
            self.flow.begin_revert();
            out.push(Outbound::Publish(BusMessage::Revert(RevertInstruction {
                from,
                to,
                reason: reason.clone(),
                action: "revert_move",
                fen: self.state.position().to_string(),
            })));
        }
        out.push(Outbound::Broadcast(Notification::MoveRejected {
            mv,
            reason,
            physical,
            state: self.state.snapshot(),
        }));
        out
    }
}
