//! Bus topic names.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    // Consumed
    MovePlayer,
    MoveWeb,
    MoveAi,
    EngineMoveConfirmed,
    EngineMoveRejected,
    StatusRaspi,
    StatusEngine,
    StateUpdate,
    LogUpdate,
    PossibleMovesRequest,
    PossibleMovesResponse,
    EngineResetConfirmed,
    InternalRequestAiMove,
    InternalPendingUiNotification,
    ControlRestart,
    // Published only
    MoveEngine,
    MoveRaspi,
    MoveRaspiRejected,
    ControlRestartExternal,
    EnginePossibleMovesRequest,
}

impl Topic {
    /// Every topic the coordinator subscribes to.
    pub const SUBSCRIBED: [Topic; 15] = [
        Topic::MovePlayer,
        Topic::MoveWeb,
        Topic::MoveAi,
        Topic::EngineMoveConfirmed,
        Topic::EngineMoveRejected,
        Topic::StatusRaspi,
        Topic::StatusEngine,
        Topic::StateUpdate,
        Topic::LogUpdate,
        Topic::PossibleMovesRequest,
        Topic::PossibleMovesResponse,
        Topic::EngineResetConfirmed,
        Topic::InternalRequestAiMove,
        Topic::InternalPendingUiNotification,
        Topic::ControlRestart,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Topic::MovePlayer => "move/player",
            Topic::MoveWeb => "move/web",
            Topic::MoveAi => "move/ai",
            Topic::EngineMoveConfirmed => "engine/move/confirmed",
            Topic::EngineMoveRejected => "engine/move/rejected",
            Topic::StatusRaspi => "status/raspi",
            Topic::StatusEngine => "status/engine",
            Topic::StateUpdate => "state/update",
            Topic::LogUpdate => "log/update",
            Topic::PossibleMovesRequest => "move/possible_moves/request",
            Topic::PossibleMovesResponse => "engine/possible_moves/response",
            Topic::EngineResetConfirmed => "engine/reset/confirmed",
            Topic::InternalRequestAiMove => "internal/request_ai_move",
            Topic::InternalPendingUiNotification => "internal/pending_ui_notification",
            Topic::ControlRestart => "control/restart",
            Topic::MoveEngine => "move/engine",
            Topic::MoveRaspi => "move/raspi",
            Topic::MoveRaspiRejected => "move/raspi/rejected",
            Topic::ControlRestartExternal => "control/restart/external",
            Topic::EnginePossibleMovesRequest => "engine/possible_moves/request",
        }
    }

    pub fn parse(raw: &str) -> Option<Topic> {
        Self::SUBSCRIBED
            .into_iter()
            .chain([
                Topic::MoveEngine,
                Topic::MoveRaspi,
                Topic::MoveRaspiRejected,
                Topic::ControlRestartExternal,
                Topic::EnginePossibleMovesRequest,
            ])
            .find(|topic| topic.as_str() == raw)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
