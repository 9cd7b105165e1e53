//! Physical-board flow control.
//!
//! Tracks whether the board is free to take a new instruction and holds at
//! most one engine request and one UI notification until it is.

use serde_json::Value;

use crate::protocol::outbound::{AiMoveRequest, Notification};
use crate::protocol::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysicalStatus {
    #[default]
    Unknown,
    Ready,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMode {
    Idle,
    PhysicalMoving,
    RevertingIllegalMove,
}

/// A UI notification held back until the board catches up.
#[derive(Debug, Clone, PartialEq)]
pub enum QueuedNotice {
    Typed(Notification),
    /// Arrived on the internal notification topic as opaque JSON.
    Raw(Value),
}

/// What a `ready` report unblocked.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowAction {
    RevertCompleted,
    ReleaseAiRequest(AiMoveRequest),
    ReleaseUiNotice(QueuedNotice),
}

#[derive(Debug, Clone, Default)]
pub struct FlowControl {
    status: PhysicalStatus,
    awaiting_physical_confirmation: bool,
    awaiting_illegal_move_revert: bool,
    queued_ai_request: Option<AiMoveRequest>,
    queued_ui_notice: Option<QueuedNotice>,
}

impl FlowControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FlowMode {
        if self.awaiting_illegal_move_revert {
            FlowMode::RevertingIllegalMove
        } else if self.status == PhysicalStatus::Moving {
            FlowMode::PhysicalMoving
        } else {
            FlowMode::Idle
        }
    }

    pub fn status(&self) -> PhysicalStatus {
        self.status
    }

    pub fn is_reverting(&self) -> bool {
        self.awaiting_illegal_move_revert
    }

    pub fn awaiting_physical_confirmation(&self) -> bool {
        self.awaiting_physical_confirmation
    }

    pub fn queued_ai_request(&self) -> Option<&AiMoveRequest> {
        self.queued_ai_request.as_ref()
    }

    pub fn queued_ui_notice(&self) -> Option<&QueuedNotice> {
        self.queued_ui_notice.as_ref()
    }

    pub fn begin_revert(&mut self) {
        self.awaiting_illegal_move_revert = true;
    }

    /// Last write wins. Returns the request that was displaced, if any.
    pub fn queue_ai_request(&mut self, request: AiMoveRequest) -> Option<AiMoveRequest> {
        self.queued_ai_request.replace(request)
    }

    /// Last write wins. Returns the notice that was displaced, if any.
    pub fn queue_ui_notice(&mut self, notice: QueuedNotice) -> Option<QueuedNotice> {
        self.queued_ui_notice.replace(notice)
    }

    /// Feed one physical-board status report through the state machine.
    pub fn on_physical_signal(&mut self, signal: Signal) -> Option<FlowAction> {
        match signal {
            Signal::Moving => {
                self.status = PhysicalStatus::Moving;
                if !self.awaiting_illegal_move_revert {
                    self.awaiting_physical_confirmation = true;
                }
                None
            }
            Signal::Ready => {
                self.status = PhysicalStatus::Ready;
                if self.awaiting_illegal_move_revert {
                    self.awaiting_illegal_move_revert = false;
                    return Some(FlowAction::RevertCompleted);
                }
                if !self.awaiting_physical_confirmation {
                    return None;
                }
                if let Some(request) = self.queued_ai_request.take() {
                    self.awaiting_physical_confirmation = false;
                    return Some(FlowAction::ReleaseAiRequest(request));
                }
                if let Some(notice) = self.queued_ui_notice.take() {
                    self.awaiting_physical_confirmation = false;
                    return Some(FlowAction::ReleaseUiNotice(notice));
                }
                None
            }
            Signal::Other => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
