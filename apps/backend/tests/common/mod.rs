#![allow(dead_code)]

use std::env;

use chessbridge::domain::Side;
use chessbridge::protocol::{BusEvent, Outbound, Topic};
use chessbridge::MoveCoordinator;
use proptest::prelude::ProptestConfig;
use serde_json::Value;

#[ctor::ctor]
fn init_logging() {
    chessbridge_test_support::logging::init();
}

pub const FEN_AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
pub const FEN_AFTER_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";

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

/// Coordinator with the engine playing black.
pub fn coordinator() -> MoveCoordinator {
    MoveCoordinator::new(Side::Black)
}

/// Decode a wire message, panicking on malformed test fixtures.
pub fn event(topic: Topic, payload: Value) -> BusEvent {
    BusEvent::decode(topic.as_str(), &payload.to_string())
        .unwrap_or_else(|e| panic!("fixture for {topic} failed to decode: {e}"))
}

pub fn published(effects: &[Outbound]) -> Vec<Topic> {
    effects.iter().filter_map(Outbound::published_topic).collect()
}

pub fn broadcasts(effects: &[Outbound]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|o| o.broadcast_kind().map(str::to_string))
        .collect()
}
