use serde_json::json;

use crate::domain::{
    CastleSide, GameStatus, Move, MoveKind, PromotionPiece, RookHop, Side, SpecialMove, Square,
};
use crate::errors::domain::{DomainError, ValidationKind};

fn sq(s: &str) -> Square {
    Square::parse(s).unwrap()
}

#[test]
fn squares_are_normalized_and_validated() {
    assert_eq!(sq(" E2 ").as_str(), "e2");
    for bad in ["", "e9", "i1", "e22", "2e"] {
        match Square::parse(bad) {
            Err(DomainError::Validation(ValidationKind::InvalidSquare, _)) => {}
            other => panic!("expected InvalidSquare for {bad:?}, got {other:?}"),
        }
    }
}

#[test]
fn side_parsing_and_fen_turn() {
    assert_eq!("White".parse::<Side>().unwrap(), Side::White);
    assert_eq!("b".parse::<Side>().unwrap(), Side::Black);
    assert!("green".parse::<Side>().is_err());
    assert_eq!(
        Side::from_fen(crate::domain::STARTING_POSITION),
        Some(Side::White)
    );
    assert_eq!(Side::from_fen("8/8/8/8/8/8/8/8 b - - 0 1"), Some(Side::Black));
    assert_eq!(Side::from_fen("garbage"), None);
}

#[test]
fn unknown_game_status_means_playing() {
    assert_eq!(GameStatus::from_wire("Checkmate"), GameStatus::Checkmate);
    assert_eq!(GameStatus::from_wire("check"), GameStatus::Playing);
    assert!(GameStatus::Draw.is_terminal());
    assert!(!GameStatus::Playing.is_terminal());
}

#[test]
fn promotion_piece_aliases() {
    assert_eq!(PromotionPiece::parse("q").unwrap(), PromotionPiece::Queen);
    assert_eq!(PromotionPiece::parse("Knight").unwrap(), PromotionPiece::Knight);
    assert!(PromotionPiece::parse("king").is_err());
}

#[test]
fn classify_covers_every_kind() {
    assert_eq!(MoveKind::classify(None, None, None, None), MoveKind::Plain);
    assert_eq!(
        MoveKind::classify(None, None, Some("pawn".into()), None),
        MoveKind::Capture {
            captured: "pawn".into()
        }
    );
    assert_eq!(
        MoveKind::classify(Some(SpecialMove::CastlingQueenside), None, None, None),
        MoveKind::Castling {
            side: CastleSide::Queenside,
            rook: None
        }
    );
    assert_eq!(
        MoveKind::classify(Some(SpecialMove::Promotion), None, None, None),
        MoveKind::Promotion {
            piece: PromotionPiece::Queen
        }
    );
    assert_eq!(
        MoveKind::classify(
            Some(SpecialMove::PromotionCapture),
            Some(PromotionPiece::Rook),
            None,
            None
        ),
        MoveKind::PromotionCapture {
            piece: PromotionPiece::Rook,
            captured: "unknown".into()
        }
    );
    assert_eq!(
        MoveKind::classify(Some(SpecialMove::Other), None, Some("knight".into()), None),
        MoveKind::Capture {
            captured: "knight".into()
        }
    );
}

#[test]
fn proposal_kind_wins_but_engine_fills_rook_hop() {
    let hop = RookHop {
        from: sq("h1"),
        to: sq("f1"),
    };
    let proposed = MoveKind::Castling {
        side: CastleSide::Kingside,
        rook: None,
    };
    let confirmed = MoveKind::Castling {
        side: CastleSide::Kingside,
        rook: Some(hop.clone()),
    };
    assert_eq!(
        MoveKind::merge(&proposed, confirmed),
        MoveKind::Castling {
            side: CastleSide::Kingside,
            rook: Some(hop)
        }
    );

    let capture = MoveKind::Capture {
        captured: "bishop".into(),
    };
    assert_eq!(MoveKind::merge(&MoveKind::Plain, capture.clone()), capture);
    assert_eq!(
        MoveKind::merge(&capture, MoveKind::Plain),
        MoveKind::Capture {
            captured: "bishop".into()
        }
    );
}

#[test]
fn move_serializes_flat_and_sparse() {
    let plain = Move::plain(sq("e2"), sq("e4"));
    assert_eq!(
        serde_json::to_value(&plain).unwrap(),
        json!({"from": "e2", "to": "e4"})
    );

    let mut promo = Move::plain(sq("e7"), sq("e8")).with_kind(MoveKind::Promotion {
        piece: PromotionPiece::Knight,
    });
    promo.meta.gives_check = true;
    promo.meta.notation = Some("e8=N+".into());
    assert_eq!(
        serde_json::to_value(&promo).unwrap(),
        json!({
            "from": "e7",
            "to": "e8",
            "special_move": "promotion",
            "promotion_piece": "knight",
            "notation": "e8=N+",
            "gives_check": true
        })
    );

    let castle = Move::plain(sq("e1"), sq("g1")).with_kind(MoveKind::Castling {
        side: CastleSide::Kingside,
        rook: Some(RookHop {
            from: sq("h1"),
            to: sq("f1"),
        }),
    });
    assert_eq!(
        serde_json::to_value(&castle).unwrap()["additional_moves"],
        json!([{"from": "h1", "to": "f1"}])
    );
}
