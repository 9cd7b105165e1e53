#![cfg(test)]

//! Test logging initialization shared by every unit test in the crate.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once. Safe to call from any number of tests.
///
/// The filter comes from `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
///
/// ```bash
/// TEST_LOG=debug cargo test -p chessbridge
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
