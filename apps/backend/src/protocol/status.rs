//! Component status parsing and normalization.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Component {
    #[serde(rename = "raspberry_pi")]
    PhysicalBoard,
    #[serde(rename = "chess_engine")]
    Engine,
}

/// A status message exactly as it arrived: a bare token or a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum RawStatus {
    Token(String),
    Structured(Map<String, Value>),
}

/// The part of a status that can move the physical-board state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Ready,
    Moving,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Ready,
    Busy,
    Error,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFormat {
    String,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedStatus {
    pub component: Component,
    pub format: StatusFormat,
    pub state: StatusState,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Map<String, Value>>,
}

impl RawStatus {
    /// Classify a payload. JSON objects are structured, JSON strings are
    /// unquoted, anything else is taken verbatim as a token.
    pub fn classify(payload: &str) -> Self {
        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(map)) => RawStatus::Structured(map),
            Ok(Value::String(token)) => RawStatus::Token(token),
            _ => RawStatus::Token(payload.to_string()),
        }
    }

    /// Lowercased, trimmed status token, if the message carries one.
    pub fn token(&self) -> Option<String> {
        let raw = match self {
            RawStatus::Token(token) => token.as_str(),
            RawStatus::Structured(map) => map
                .get("status")
                .or_else(|| map.get("state"))
                .and_then(Value::as_str)?,
        };
        Some(raw.trim().to_ascii_lowercase())
    }

    pub fn signal(&self) -> Signal {
        match self.token().as_deref() {
            Some("ready") => Signal::Ready,
            Some("moving") => Signal::Moving,
            _ => Signal::Other,
        }
    }

    pub fn normalize(&self, component: Component) -> NormalizedStatus {
        let shown = match self {
            RawStatus::Token(token) => token.clone(),
            RawStatus::Structured(map) => Value::Object(map.clone()).to_string(),
        };
        let (state, severity, message) = match self.token().as_deref() {
            Some("ready") => (
                StatusState::Ready,
                Severity::Info,
                match component {
                    Component::PhysicalBoard => "Raspberry Pi is ready for commands",
                    Component::Engine => "Chess engine is ready for moves",
                }
                .to_string(),
            ),
            Some("moving") => (
                StatusState::Busy,
                Severity::Info,
                "Raspberry Pi is executing a physical move".to_string(),
            ),
            Some("thinking") => (
                StatusState::Busy,
                Severity::Info,
                "Chess engine is calculating the next move".to_string(),
            ),
            Some("analyzing") => (
                StatusState::Busy,
                Severity::Info,
                "Chess engine is analyzing the position".to_string(),
            ),
            Some("error") => (
                StatusState::Error,
                Severity::Error,
                match component {
                    Component::PhysicalBoard => "Raspberry Pi encountered an error",
                    Component::Engine => "Chess engine encountered an error",
                }
                .to_string(),
            ),
            _ => (
                StatusState::Unknown,
                Severity::Warning,
                format!("Unknown status: {shown}"),
            ),
        };

        let (format, raw, status) = match self {
            RawStatus::Token(token) => (StatusFormat::String, Some(token.clone()), None),
            RawStatus::Structured(map) => (StatusFormat::Json, None, Some(map.clone())),
        };

        NormalizedStatus {
            component,
            format,
            state,
            message,
            severity,
            raw,
            status,
        }
    }
}
