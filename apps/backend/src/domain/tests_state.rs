use crate::domain::{
    Confirmation, GameState, GameStatus, Move, MoveKind, Side, Square, STARTING_POSITION,
};

const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";

fn sq(s: &str) -> Square {
    Square::parse(s).unwrap()
}

fn confirmation(from: &str, to: &str, fen: &str, next: Side) -> Confirmation {
    Confirmation {
        mv: Move::plain(sq(from), sq(to)),
        fen: fen.to_string(),
        next_turn: next,
        physical: false,
        game_status: None,
        winner: None,
    }
}

#[test]
fn fresh_state_is_the_starting_position() {
    let state = GameState::new();
    let snap = state.snapshot();
    assert_eq!(snap.fen, STARTING_POSITION);
    assert_eq!(snap.turn, Side::White);
    assert!(snap.moves.is_empty());
    assert!(snap.pending_moves.is_empty());
    assert_eq!(snap.game_status, GameStatus::Playing);
    assert!(!snap.game_ended);
    assert!(!snap.in_check);
}

#[test]
fn confirm_moves_pending_into_history() {
    let mut state = GameState::new();
    state.add_pending_move(Move::plain(sq("e2"), sq("e4")), true);

    let outcome = state.confirm_move(confirmation("e2", "e4", AFTER_E4, Side::Black), 100);

    assert!(outcome.appended);
    assert!(outcome.matched_pending);
    assert!(state.pending().is_empty());
    assert_eq!(state.history().len(), 1);
    let entry = &state.history()[0];
    assert_eq!(entry.player, Side::White);
    assert_eq!(entry.ply, 1);
    assert_eq!(entry.timestamp, 100);
    assert_eq!(entry.fen, AFTER_E4);
    assert_eq!(state.position(), AFTER_E4);
    assert_eq!(state.turn(), Side::Black);
}

#[test]
fn pending_metadata_is_folded_into_history() {
    let mut state = GameState::new();
    let mut proposed = Move::plain(sq("d4"), sq("e5")).with_kind(MoveKind::Capture {
        captured: "pawn".into(),
    });
    proposed.meta.available_pieces = Some(serde_json::json!(["queen"]));
    state.add_pending_move(proposed, false);

    let mut confirmed = confirmation("d4", "e5", "fen-x b - - 0 3", Side::Black);
    confirmed.mv.meta.notation = Some("dxe5".into());
    let outcome = state.confirm_move(confirmed, 5);

    assert_eq!(
        outcome.mv.kind,
        MoveKind::Capture {
            captured: "pawn".into()
        }
    );
    assert_eq!(outcome.mv.meta.notation.as_deref(), Some("dxe5"));
    assert!(outcome.mv.meta.available_pieces.is_some());
}

#[test]
fn identical_history_entry_is_not_appended_twice() {
    let mut state = GameState::new();
    state.confirm_move(confirmation("e2", "e4", AFTER_E4, Side::White), 1);
    let outcome = state.confirm_move(confirmation("e2", "e4", AFTER_E4, Side::White), 2);

    assert!(!outcome.appended);
    assert_eq!(state.history().len(), 1);
}

#[test]
fn redelivered_confirmation_after_turn_change_is_a_no_op() {
    const AFTER_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
    let mut state = GameState::new();
    state.confirm_move(confirmation("e2", "e4", AFTER_E4, Side::Black), 1);
    state.confirm_move(confirmation("e7", "e5", AFTER_E5, Side::White), 2);

    let outcome = state.confirm_move(confirmation("e2", "e4", AFTER_E4, Side::Black), 3);

    assert!(!outcome.appended);
    assert_eq!(state.history().len(), 2);
    assert_eq!(state.history()[1].player, Side::Black);
    assert_eq!(state.position(), AFTER_E5);
    assert_eq!(state.turn(), Side::White);
}

#[test]
fn same_squares_with_new_position_is_a_new_entry() {
    let mut state = GameState::new();
    state.confirm_move(confirmation("a1", "a2", "p1 b - - 0 1", Side::Black), 1);
    state.confirm_move(confirmation("a7", "a6", "p2 w - - 0 2", Side::White), 2);
    state.confirm_move(confirmation("a2", "a1", "p3 b - - 1 2", Side::Black), 3);
    state.confirm_move(confirmation("a6", "a7", "p4 w - - 2 3", Side::White), 4);
    state.confirm_move(confirmation("a1", "a2", "p5 b - - 3 3", Side::Black), 5);

    assert_eq!(state.history().len(), 5);
    assert_eq!(state.history()[4].ply, 5);
}

#[test]
fn check_and_terminal_status_follow_the_engine() {
    let mut state = GameState::new();
    let mut c = confirmation("d8", "h4", "mate w - - 0 2", Side::White);
    c.mv.meta.gives_check = true;
    c.game_status = Some(GameStatus::Checkmate);
    c.winner = Some(Side::Black);
    state.confirm_move(c, 9);

    let snap = state.snapshot();
    assert!(snap.in_check);
    assert_eq!(snap.check_player, Some(Side::White));
    assert!(snap.game_ended);
    assert_eq!(snap.winner, Some(Side::Black));

    state.confirm_move(confirmation("a2", "a3", "later b - - 0 3", Side::Black), 10);
    assert!(!state.snapshot().in_check);
}

#[test]
fn reject_never_touches_position_or_turn() {
    let mut state = GameState::new();
    state.add_pending_move(Move::plain(sq("e2"), sq("e5")), true);
    state.add_pending_move(Move::plain(sq("g1"), sq("f3")), false);

    assert_eq!(state.reject_move(&sq("e2"), &sq("e5")), 1);
    assert_eq!(state.reject_move(&sq("e2"), &sq("e5")), 0);
    assert_eq!(state.pending().len(), 1);
    assert_eq!(state.position(), STARTING_POSITION);
    assert_eq!(state.turn(), Side::White);
}

#[test]
fn reset_and_set_position() {
    let mut state = GameState::new();
    state.add_pending_move(Move::plain(sq("e2"), sq("e4")), false);
    state.confirm_move(confirmation("e2", "e4", AFTER_E4, Side::Black), 1);
    state.reset();
    assert_eq!(state.snapshot(), GameState::new().snapshot());

    state.add_pending_move(Move::plain(sq("a2"), sq("a3")), false);
    state.set_position(AFTER_E4);
    assert_eq!(state.position(), AFTER_E4);
    assert_eq!(state.turn(), Side::Black);
    assert!(state.pending().is_empty());
}

#[test]
fn snapshot_serializes_wire_keys() {
    let mut state = GameState::new();
    state.add_pending_move(Move::plain(sq("e2"), sq("e4")), true);
    let value = serde_json::to_value(state.snapshot()).unwrap();
    for key in [
        "fen",
        "moves",
        "turn",
        "pending_moves",
        "game_status",
        "winner",
        "game_ended",
        "in_check",
        "check_player",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["pending_moves"][0]["physical"], true);
    assert_eq!(value["pending_moves"][0]["from"], "e2");
    assert_eq!(value["game_status"], "playing");
}
