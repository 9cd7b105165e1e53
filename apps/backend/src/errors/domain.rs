//! Domain-level error type used by the wire boundary and the pure domain.
//!
//! HTTP- and transport-agnostic. Handlers return `AppError` and convert
//! from `DomainError` through `From<DomainError> for AppError`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// What made an inbound payload unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    InvalidJson,
    MissingField(&'static str),
    InvalidSquare,
    InvalidSide,
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Payload shape or value rejected
    Validation(ValidationKind, String),
    /// Message arrived on a topic nobody consumes
    UnknownTopic(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::UnknownTopic(topic) => write!(f, "unknown topic: {topic}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn missing(field: &'static str) -> Self {
        Self::Validation(
            ValidationKind::MissingField(field),
            format!("missing required field `{field}`"),
        )
    }

    pub fn invalid_json(err: &serde_json::Error) -> Self {
        Self::Validation(ValidationKind::InvalidJson, err.to_string())
    }
}
