use std::error::Error as StdError;

use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::ValidationKind;
use crate::errors::{DomainError, ErrorCode};
use crate::trace_ctx;

pub type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal {
        code: ErrorCode,
        detail: String,
        #[source]
        source: BoxedSource,
    },
    #[error("Configuration error: {detail}")]
    Config {
        detail: String,
        #[source]
        source: BoxedSource,
    },
    #[error("Bus unavailable: {detail}")]
    BusUnavailable {
        detail: String,
        #[source]
        source: BoxedSource,
    },
    #[error("Coordinator unavailable: {detail}")]
    CoordinatorUnavailable { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::BadRequest { code, .. } => *code,
            AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::BusUnavailable { .. } => ErrorCode::BusUnavailable,
            AppError::CoordinatorUnavailable { .. } => ErrorCode::CoordinatorUnavailable,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::Internal { detail, .. }
            | AppError::Config { detail, .. }
            | AppError::BusUnavailable { detail, .. }
            | AppError::CoordinatorUnavailable { detail } => detail.clone(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BusUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::CoordinatorUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(
        code: ErrorCode,
        detail: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Internal {
            code,
            detail: detail.into(),
            source: Box::new(source),
        }
    }

    pub fn config(detail: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Config {
            detail: detail.into(),
            source: Box::new(source),
        }
    }

    pub fn bus_unavailable(
        detail: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::BusUnavailable {
            detail: detail.into(),
            source: Box::new(source),
        }
    }

    pub fn coordinator_unavailable(detail: impl Into<String>) -> Self {
        Self::CoordinatorUnavailable {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(|c| c.to_lowercase()))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::InvalidJson => ErrorCode::InvalidJson,
                    ValidationKind::MissingField(_) => ErrorCode::MissingField,
                    ValidationKind::InvalidSquare => ErrorCode::InvalidSquare,
                    ValidationKind::InvalidSide => ErrorCode::InvalidSide,
                    _ => ErrorCode::ValidationError,
                };
                AppError::invalid(code, detail)
            }
            DomainError::UnknownTopic(topic) => {
                AppError::bad_request(ErrorCode::UnknownTopic, format!("unknown topic {topic}"))
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://chessbridge.local/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.detail(),
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id));
        if status == StatusCode::SERVICE_UNAVAILABLE {
            builder.insert_header(("Retry-After", "5"));
        }
        builder.json(problem_details)
    }
}
