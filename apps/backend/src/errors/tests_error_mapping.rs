// Mapping from wire/domain errors to HTTP problem codes.
use actix_web::http::StatusCode;

use crate::errors::domain::{DomainError, ValidationKind};
use crate::{AppError, ErrorCode};

#[test]
fn validation_kinds_map_to_specific_codes() {
    let cases = [
        (ValidationKind::InvalidJson, ErrorCode::InvalidJson),
        (ValidationKind::MissingField("from"), ErrorCode::MissingField),
        (ValidationKind::InvalidSquare, ErrorCode::InvalidSquare),
        (ValidationKind::InvalidSide, ErrorCode::InvalidSide),
        (
            ValidationKind::Other("promotion_piece".into()),
            ErrorCode::ValidationError,
        ),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::validation(kind, "bad").into();
        assert_eq!(app.code(), code);
        assert_eq!(app.status(), StatusCode::BAD_REQUEST);
    }
}

#[test]
fn unknown_topic_is_bad_request() {
    let app: AppError = DomainError::UnknownTopic("chess/nowhere".into()).into();
    assert_eq!(app.code(), ErrorCode::UnknownTopic);
    assert_eq!(app.status(), StatusCode::BAD_REQUEST);
    assert!(app.to_string().contains("chess/nowhere"));
}

#[test]
fn coordinator_unavailable_is_503() {
    let app = AppError::coordinator_unavailable("gone");
    assert_eq!(app.code(), ErrorCode::CoordinatorUnavailable);
    assert_eq!(app.status(), StatusCode::SERVICE_UNAVAILABLE);
}
