use serde_json::json;

use crate::domain::{
    derive_instruction, CastleSide, InstructionAction, Move, MoveKind, PromotionPiece, RookHop,
    Side, Square,
};

fn sq(s: &str) -> Square {
    Square::parse(s).unwrap()
}

#[test]
fn plain_move_names_the_mover() {
    let ins = derive_instruction(&Move::plain(sq("e2"), sq("e4")), "fen", Side::Black);
    assert_eq!(
        ins.action,
        InstructionAction::Move {
            color_moved: Side::White
        }
    );
    assert_eq!(ins.steps, vec!["Move piece from e2 to e4".to_string()]);

    let value = serde_json::to_value(&ins).unwrap();
    assert_eq!(value["type"], "move");
    assert_eq!(value["fen"], "fen");
    assert!(value.get("gives_check").is_none());
}

#[test]
fn capture_removes_before_moving() {
    let mv = Move::plain(sq("d5"), sq("e4")).with_kind(MoveKind::Capture {
        captured: "pawn".into(),
    });
    let ins = derive_instruction(&mv, "fen", Side::White);
    let value = serde_json::to_value(&ins).unwrap();
    assert_eq!(value["type"], "capture");
    assert_eq!(value["capture"], true);
    assert_eq!(value["color_moved"], "black");
    assert_eq!(value["color_captured"], "white");
    assert_eq!(ins.steps[0], "Remove captured pawn from e4");
    assert_eq!(ins.steps[1], "Move piece from d5 to e4");
}

#[test]
fn castling_moves_king_then_rook() {
    let mv = Move::plain(sq("e1"), sq("g1")).with_kind(MoveKind::Castling {
        side: CastleSide::Kingside,
        rook: Some(RookHop {
            from: sq("h1"),
            to: sq("f1"),
        }),
    });
    let value = serde_json::to_value(derive_instruction(&mv, "fen", Side::Black)).unwrap();
    assert_eq!(value["type"], "castling");
    assert_eq!(value["subtype"], "kingside");
    assert_eq!(
        value["moves"],
        json!([
            {"from": "e1", "to": "g1", "piece": "king", "order": 1},
            {"from": "h1", "to": "f1", "piece": "rook", "order": 2}
        ])
    );
}

#[test]
fn castling_rook_is_derived_when_missing() {
    let mv = Move::plain(sq("e8"), sq("c8")).with_kind(MoveKind::Castling {
        side: CastleSide::Queenside,
        rook: None,
    });
    let ins = derive_instruction(&mv, "fen", Side::White);
    match ins.action {
        InstructionAction::Castling { moves, .. } => {
            assert_eq!(moves[1].from, sq("a8"));
            assert_eq!(moves[1].to, sq("d8"));
        }
        other => panic!("expected castling, got {other:?}"),
    }
    assert_eq!(ins.steps[1], "Move rook from a8 to d8");
}

#[test]
fn promotion_with_capture_and_check() {
    let mut mv = Move::plain(sq("b7"), sq("a8")).with_kind(MoveKind::PromotionCapture {
        piece: PromotionPiece::Queen,
        captured: "rook".into(),
    });
    mv.meta.gives_check = true;
    let ins = derive_instruction(&mv, "fen", Side::Black);
    let value = serde_json::to_value(&ins).unwrap();
    assert_eq!(value["type"], "promotion_capture");
    assert_eq!(value["piece_removed"], "pawn");
    assert_eq!(value["piece_placed"], "queen");
    assert_eq!(value["piece_captured"], "rook");
    assert_eq!(value["color"], "white");
    assert_eq!(value["gives_check"], true);
    assert_eq!(ins.steps.len(), 4);
    assert_eq!(ins.steps[3], "Piece gives check to the opposing king");
}

#[test]
fn promotion_defaults_and_completion_step() {
    let mv = Move::plain(sq("a2"), sq("a1")).with_kind(MoveKind::Promotion {
        piece: PromotionPiece::default(),
    });
    let ins = derive_instruction(&mv, "fen", Side::White);
    assert_eq!(ins.steps[0], "Remove black pawn from a2");
    assert_eq!(ins.steps[1], "Place black queen on a1");
    assert_eq!(ins.steps[2], "Promotion complete");
}
