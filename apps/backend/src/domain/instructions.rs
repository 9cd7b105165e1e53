//! Physical board instructions for a move the board did not make itself.

use serde::Serialize;

use super::moves::{CastleSide, Move, MoveKind, PromotionPiece, RookHop, Side, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    King,
    Rook,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceHop {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub order: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstructionAction {
    Move {
        color_moved: Side,
    },
    Capture {
        piece_captured: String,
        capture: bool,
        color_moved: Side,
        color_captured: Side,
    },
    Castling {
        subtype: CastleSide,
        moves: Vec<PieceHop>,
    },
    Promotion {
        piece_removed: &'static str,
        piece_placed: PromotionPiece,
        color: Side,
    },
    PromotionCapture {
        piece_removed: &'static str,
        piece_placed: PromotionPiece,
        piece_captured: String,
        capture: bool,
        color: Side,
    },
}

/// Payload for `move/raspi`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicalInstruction {
    pub from: Square,
    pub to: Square,
    pub fen: String,
    #[serde(flatten)]
    pub action: InstructionAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub gives_check: bool,
    pub steps: Vec<String>,
}

/// Rook squares implied by the king's move when the engine sent none.
fn implied_rook_hop(side: CastleSide, king_to: &Square) -> RookHop {
    let rank = king_to.rank();
    let (from, to) = match side {
        CastleSide::Kingside => ('h', 'f'),
        CastleSide::Queenside => ('a', 'd'),
    };
    RookHop {
        from: Square::from_parts(from, rank),
        to: Square::from_parts(to, rank),
    }
}

/// Build the instruction telling the board how to reproduce `mv`.
///
/// `next_turn` is the side to move after `mv`, so the mover is its opponent.
pub fn derive_instruction(mv: &Move, fen: &str, next_turn: Side) -> PhysicalInstruction {
    let mover = next_turn.opponent();
    let (from, to) = (&mv.from, &mv.to);
    let check_step = |done: &str| {
        if mv.meta.gives_check {
            "Piece gives check to the opposing king".to_string()
        } else {
            done.to_string()
        }
    };

    let (action, mut steps) = match &mv.kind {
        MoveKind::Plain => (
            InstructionAction::Move { color_moved: mover },
            vec![format!("Move piece from {from} to {to}")],
        ),
        MoveKind::Capture { captured } => (
            InstructionAction::Capture {
                piece_captured: captured.clone(),
                capture: true,
                color_moved: mover,
                color_captured: next_turn,
            },
            vec![
                format!("Remove captured {captured} from {to}"),
                format!("Move piece from {from} to {to}"),
                check_step("Capture complete"),
            ],
        ),
        MoveKind::Castling { side, rook } => {
            let rook = rook.clone().unwrap_or_else(|| implied_rook_hop(*side, to));
            let steps = vec![
                format!("Move king from {from} to {to}"),
                format!("Move rook from {} to {}", rook.from, rook.to),
            ];
            let moves = vec![
                PieceHop {
                    from: from.clone(),
                    to: to.clone(),
                    piece: Piece::King,
                    order: 1,
                },
                PieceHop {
                    from: rook.from,
                    to: rook.to,
                    piece: Piece::Rook,
                    order: 2,
                },
            ];
            (
                InstructionAction::Castling {
                    subtype: *side,
                    moves,
                },
                steps,
            )
        }
        MoveKind::Promotion { piece } => (
            InstructionAction::Promotion {
                piece_removed: "pawn",
                piece_placed: *piece,
                color: mover,
            },
            vec![
                format!("Remove {mover} pawn from {from}"),
                format!("Place {mover} {} on {to}", piece.as_str()),
                check_step("Promotion complete"),
            ],
        ),
        MoveKind::PromotionCapture { piece, captured } => (
            InstructionAction::PromotionCapture {
                piece_removed: "pawn",
                piece_placed: *piece,
                piece_captured: captured.clone(),
                capture: true,
                color: mover,
            },
            vec![
                format!("Remove {mover} pawn from {from}"),
                format!("Remove captured {captured} from {to}"),
                format!("Place {mover} {} on {to}", piece.as_str()),
                check_step("Promotion with capture complete"),
            ],
        ),
    };

    if mv.meta.gives_check && matches!(mv.kind, MoveKind::Plain | MoveKind::Castling { .. }) {
        steps.push(check_step(""));
    }

    PhysicalInstruction {
        from: from.clone(),
        to: to.clone(),
        fen: fen.to_string(),
        action,
        notation: mv.meta.notation.clone(),
        gives_check: mv.meta.gives_check,
        steps,
    }
}
