//! Sliding-window filter for duplicate engine confirmations.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use xxhash_rust::xxh3::xxh3_64;

/// Repeats inside this window are dropped.
pub const DUPLICATE_WINDOW: Duration = Duration::from_secs(5);
/// Fingerprints older than this are forgotten.
pub const EVICT_AFTER: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
pub struct ConfirmationWindow {
    seen: HashMap<u64, Instant>,
}

impl ConfirmationWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(from: &str, to: &str, fen: &str) -> u64 {
        xxh3_64(format!("{from}|{to}|{fen}").as_bytes())
    }

    /// Returns `true` if the confirmation should be processed, recording it.
    /// Returns `false` for a repeat seen less than `DUPLICATE_WINDOW` ago.
    pub fn admit(&mut self, fingerprint: u64, now: Instant) -> bool {
        if let Some(seen_at) = self.seen.get(&fingerprint) {
            if now.saturating_duration_since(*seen_at) < DUPLICATE_WINDOW {
                return false;
            }
        }
        self.seen
            .retain(|_, seen_at| now.saturating_duration_since(*seen_at) <= EVICT_AFTER);
        self.seen.insert(fingerprint, now);
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
