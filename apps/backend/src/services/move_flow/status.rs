//! Component status reports and the flow-control queues.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{unix_now, FlowAction, MoveCoordinator, QueuedNotice};
use crate::protocol::outbound::AiMoveRequest;
use crate::protocol::{BusMessage, Component, Notification, Outbound, RawStatus};

const REVERT_COMPLETED_MESSAGE: &str =
    "Illegal move has been reverted. Board is ready for next move.";

impl MoveCoordinator {
    /// Always forwarded to the UI, then fed to flow control.
    pub(super) fn handle_physical_status(&mut self, raw: &RawStatus) -> Vec<Outbound> {
        let timestamp = unix_now();
        let mut out = vec![Outbound::Broadcast(Notification::RaspiStatus {
            data: raw.normalize(Component::PhysicalBoard),
            timestamp,
        })];

        match self.flow.on_physical_signal(raw.signal()) {
            None => {}
            Some(FlowAction::RevertCompleted) => {
                info!("Illegal move revert completed, accepting moves again");
                out.push(Outbound::Broadcast(Notification::RevertCompleted {
                    message: REVERT_COMPLETED_MESSAGE.to_string(),
                    timestamp,
                    status: "ready_for_move",
                }));
            }
            Some(FlowAction::ReleaseAiRequest(request)) => {
                info!(fen = %request.fen, "Board ready, sending queued AI move request");
                out.push(Outbound::Publish(BusMessage::AiMove(request)));
            }
            Some(FlowAction::ReleaseUiNotice(notice)) => {
                info!("Board ready, sending queued UI notification");
                flush_notice(notice, &mut out);
            }
        }

        out
    }

    /// Forwarded to the UI only; engine busy/ready never gates the board.
    pub(super) fn handle_engine_status(&mut self, raw: &RawStatus) -> Vec<Outbound> {
        vec![Outbound::Broadcast(Notification::EngineStatus {
            data: raw.normalize(Component::Engine),
            timestamp: unix_now(),
        })]
    }

    pub(super) fn handle_queued_ai_request(&mut self, fen: String) -> Vec<Outbound> {
        if self.state.status().is_terminal() {
            warn!("AI move request ignored, game is over");
            return Vec::new();
        }
        if self.flow.queue_ai_request(AiMoveRequest::new(fen)).is_some() {
            debug!("Replaced queued AI move request");
        }
        Vec::new()
    }

    pub(super) fn handle_queued_ui_notice(&mut self, value: Value) -> Vec<Outbound> {
        if self.flow.queue_ui_notice(QueuedNotice::Raw(value)).is_some() {
            debug!("Replaced queued UI notification");
        }
        Vec::new()
    }
}

/// Broadcast a held notification, splitting an embedded `game_over` out
/// into its own broadcast first.
fn flush_notice(notice: QueuedNotice, out: &mut Vec<Outbound>) {
    match notice {
        QueuedNotice::Typed(Notification::AiMoveExecuted {
            mv,
            state,
            game_over: Some(over),
        }) => {
            out.push(Outbound::Broadcast(Notification::GameOver(over)));
            out.push(Outbound::Broadcast(Notification::AiMoveExecuted {
                mv,
                state,
                game_over: None,
            }));
        }
        QueuedNotice::Typed(notification) => out.push(Outbound::Broadcast(notification)),
        QueuedNotice::Raw(mut value) => {
            let embedded = value
                .as_object_mut()
                .and_then(|object| object.remove("game_over"));
            if let Some(Value::Object(fields)) = embedded {
                let mut game_over = Map::new();
                game_over.insert("type".to_string(), Value::from("game_over"));
                game_over.extend(fields);
                out.push(Outbound::Relay(Value::Object(game_over)));
            }
            out.push(Outbound::Relay(value));
        }
    }
}
