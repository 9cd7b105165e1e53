//! Error handling for the chessbridge backend.

pub mod domain;
pub mod error_code;

pub use domain::DomainError;
pub use error_code::ErrorCode;

#[cfg(test)]
mod tests_error_mapping;
