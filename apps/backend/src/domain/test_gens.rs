// Proptest generators for domain types.

use std::env;

use proptest::prelude::*;

use crate::domain::{Move, Side, Square};

pub fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(32);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

pub fn square() -> impl Strategy<Value = Square> {
    (0u8..8, 0u8..8).prop_map(|(f, r)| Square::from_parts((b'a' + f) as char, (b'1' + r) as char))
}

pub fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::White), Just(Side::Black)]
}

/// A plain move whose squares differ.
pub fn plain_move() -> impl Strategy<Value = Move> {
    (square(), square())
        .prop_filter("from and to differ", |(from, to)| from != to)
        .prop_map(|(from, to)| Move::plain(from, to))
}

/// A made-up FEN whose placement field is unique per `n`.
pub fn fen_for(n: usize, side_to_move: Side) -> String {
    let flag = match side_to_move {
        Side::White => 'w',
        Side::Black => 'b',
    };
    format!("fen-{n} {flag} - - 0 {n}")
}
