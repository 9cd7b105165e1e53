//! Error codes for the chessbridge HTTP surface.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in problem-details responses. Add new codes here; never pass ad-hoc
//! strings as error codes.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// Request body was empty
    EmptyBody,
    /// Request body was not valid JSON
    InvalidJson,
    /// Required field missing from a payload
    MissingField,
    /// Square is not in `a1`..`h8` form
    InvalidSquare,
    /// Side is neither white nor black
    InvalidSide,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Bus and coordinator
    /// Message arrived on a topic the coordinator does not consume
    UnknownTopic,
    /// Bus connection could not be established
    BusUnavailable,
    /// The coordinator task is gone or did not answer
    CoordinatorUnavailable,

    // System
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyBody => "EMPTY_BODY",
            Self::InvalidJson => "INVALID_JSON",
            Self::MissingField => "MISSING_FIELD",
            Self::InvalidSquare => "INVALID_SQUARE",
            Self::InvalidSide => "INVALID_SIDE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::UnknownTopic => "UNKNOWN_TOPIC",
            Self::BusUnavailable => "BUS_UNAVAILABLE",
            Self::CoordinatorUnavailable => "COORDINATOR_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
