mod common;

use chessbridge::domain::{CastleSide, GameStatus, MoveKind, PromotionPiece, Side};
use chessbridge::errors::DomainError;
use chessbridge::protocol::{BusEvent, RawStatus, Topic};

fn decode(topic: Topic, payload: &str) -> Result<BusEvent, DomainError> {
    BusEvent::decode(topic.as_str(), payload)
}

#[test]
fn proposals_carry_optional_metadata() {
    let event = decode(
        Topic::MovePlayer,
        r#"{"from":"e7","to":"f8","special_move":"promotion_capture","promotion_piece":"r","captured_piece":"bishop","available_pieces":{"white":["queen"]}}"#,
    )
    .unwrap();
    let BusEvent::PhysicalMove(mv) = event else {
        panic!("expected a physical move, got {event:?}");
    };
    assert_eq!(
        mv.kind,
        MoveKind::PromotionCapture {
            piece: PromotionPiece::Rook,
            captured: "bishop".into()
        }
    );
    assert!(mv.meta.available_pieces.is_some());
}

#[test]
fn confirmations_decode_castling_rook_hop() {
    let event = decode(
        Topic::EngineMoveConfirmed,
        r#"{"from":"e1","to":"g1","fen":"f","next_player":"b","physical":true,
            "special_move":"castling_kingside","additional_moves":[{"from":"h1","to":"f1"}],
            "notation":"O-O","game_status":"in_progress"}"#,
    )
    .unwrap();
    let BusEvent::MoveConfirmed(c) = event else {
        panic!("expected a confirmation, got {event:?}");
    };
    assert!(c.physical);
    assert_eq!(c.next_turn, Side::Black);
    assert_eq!(c.game_status, Some(GameStatus::Playing));
    match c.mv.kind {
        MoveKind::Castling { side, rook } => {
            assert_eq!(side, CastleSide::Kingside);
            assert_eq!(rook.map(|r| r.to.as_str().to_string()), Some("f1".into()));
        }
        other => panic!("expected castling, got {other:?}"),
    }
}

#[test]
fn ai_moves_are_never_physical() {
    let event = decode(
        Topic::MoveAi,
        r#"{"from":"e7","to":"e5","fen":"f","next_player":"white","physical":true}"#,
    )
    .unwrap();
    assert!(matches!(event, BusEvent::AiMove(c) if !c.physical));
}

#[test]
fn malformed_messages_are_rejected() {
    let cases = [
        (Topic::MoveWeb, "not json"),
        (Topic::MoveWeb, r#"{"from":"e2"}"#),
        (Topic::MoveWeb, r#"{"from":"e9","to":"e4"}"#),
        (Topic::EngineMoveConfirmed, r#"{"from":"e2","to":"e4","next_player":"black"}"#),
        (Topic::EngineMoveConfirmed, r#"{"from":"e2","to":"e4","fen":"f","next_player":"green"}"#),
        (Topic::EngineMoveRejected, r#"{"to":"e4"}"#),
        (Topic::EngineMoveRejected, r#"{"from":"e2","to":"e4","physical":true}"#),
        (Topic::EngineResetConfirmed, r#"{"type":"reset","fen":"f"}"#),
        (Topic::InternalRequestAiMove, r#"{"fen":"f"}"#),
        (Topic::InternalPendingUiNotification, r#"{"move":{}}"#),
        (Topic::PossibleMovesResponse, r#"{"position":"e2"}"#),
    ];
    for (topic, payload) in cases {
        assert!(
            decode(topic, payload).is_err(),
            "{topic} accepted malformed payload {payload}"
        );
    }
}

#[test]
fn unknown_and_publish_only_topics_are_rejected() {
    assert!(matches!(
        BusEvent::decode("chess/unknown", "{}"),
        Err(DomainError::UnknownTopic(_))
    ));
    assert!(matches!(
        decode(Topic::MoveRaspi, "{}"),
        Err(DomainError::UnknownTopic(_))
    ));
}

#[test]
fn status_topics_accept_tokens_and_objects() {
    let token = decode(Topic::StatusRaspi, "ready").unwrap();
    assert!(matches!(token, BusEvent::PhysicalStatus(RawStatus::Token(t)) if t == "ready"));

    let object = decode(Topic::StatusEngine, r#"{"state":"thinking"}"#).unwrap();
    assert!(matches!(object, BusEvent::EngineStatus(RawStatus::Structured(_))));
}

#[test]
fn echoes_are_summarized() {
    let event = decode(
        Topic::StateUpdate,
        r#"{"fen":"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1","moves":[],"turn":"white"}"#,
    )
    .unwrap();
    let BusEvent::StateEcho(echo) = event else {
        panic!("expected a state echo");
    };
    assert!(echo.is_reset);
    assert_eq!(echo.moves, Some(0));

    let event = decode(
        Topic::LogUpdate,
        r#"{"moves":[{"from":"e2","to":"e4"},{"from":"e7","to":"e5"}]}"#,
    )
    .unwrap();
    let BusEvent::LogEcho(echo) = event else {
        panic!("expected a log echo");
    };
    assert_eq!(echo.moves, Some(2));
    assert_eq!(echo.last_move, Some(("e7".into(), "e5".into())));
}
