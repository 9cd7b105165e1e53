//! Test support utilities for the chessbridge backend.
//!
//! Shared by unit and integration tests: idempotent logging setup and
//! assertions over the problem-details error contract. This crate must not
//! depend on the backend crate itself.

pub mod logging;
pub mod problem_details;
