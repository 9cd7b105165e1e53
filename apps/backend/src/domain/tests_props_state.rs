//! Property tests for the game state store.
//!
//! Properties tested:
//! - Confirming every proposal appends exactly one entry each and empties pending
//! - Rejection never mutates position or turn
//! - Re-confirming an identical move never grows the history

use proptest::prelude::*;

use crate::domain::test_gens::{fen_for, plain_move, proptest_config, side};
use crate::domain::{Confirmation, GameState};

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn prop_each_confirmation_appends_once(
        moves in prop::collection::vec(plain_move(), 1..12),
    ) {
        let mut state = GameState::new();
        for (i, mv) in moves.iter().enumerate() {
            state.add_pending_move(mv.clone(), i % 2 == 0);
            let next = state.turn().opponent();
            let outcome = state.confirm_move(
                Confirmation {
                    mv: mv.clone(),
                    fen: fen_for(i, next),
                    next_turn: next,
                    physical: i % 2 == 0,
                    game_status: None,
                    winner: None,
                },
                i as i64,
            );
            prop_assert!(outcome.appended);
            prop_assert!(outcome.matched_pending);
            prop_assert!(state.pending().is_empty());
            prop_assert_eq!(state.history().len(), i + 1);
            prop_assert_eq!(state.history()[i].ply as usize, i + 1);
        }
    }

    #[test]
    fn prop_reject_keeps_position_and_turn(
        moves in prop::collection::vec(plain_move(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut state = GameState::new();
        for mv in &moves {
            state.add_pending_move(mv.clone(), true);
        }
        let (fen, turn) = (state.position().to_string(), state.turn());
        let target = pick.get(&moves).clone();

        let removed = state.reject_move(&target.from, &target.to);

        prop_assert!(removed >= 1);
        prop_assert!(state.pending().iter().all(|p| !p.mv.same_squares(&target.from, &target.to)));
        prop_assert_eq!(state.position(), fen.as_str());
        prop_assert_eq!(state.turn(), turn);
    }

    #[test]
    fn prop_duplicate_confirmation_is_idempotent(
        mv in plain_move(),
        next in side(),
        repeats in 2usize..5,
    ) {
        let mut state = GameState::new();
        let confirmation = Confirmation {
            mv,
            fen: fen_for(0, next),
            next_turn: state.turn(),
            physical: false,
            game_status: None,
            winner: None,
        };
        for n in 0..repeats {
            state.confirm_move(confirmation.clone(), n as i64);
        }
        prop_assert_eq!(state.history().len(), 1);
    }
}
