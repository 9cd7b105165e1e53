//! Problem Details assertions for HTTP tests.
//!
//! Mirrors the backend's error body shape without depending on backend types.

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Assert that response parts conform to the error contract:
/// - status matches and is echoed in the body
/// - content type is `application/problem+json`
/// - `x-trace-id` header is present and equals the body `trace_id`
/// - `code` matches, and `detail` contains the expected fragment if given
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status);

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let problem: ProblemDetailsLike =
        serde_json::from_slice(body_bytes).expect("body should be valid ProblemDetails JSON");

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert_eq!(problem.trace_id, trace_id_header);

    assert_eq!(problem.status, expected_status.as_u16());
    assert_eq!(problem.code, expected_code);

    if let Some(fragment) = expected_detail_contains {
        assert!(
            problem.detail.contains(fragment),
            "detail {:?} should contain {:?}",
            problem.detail,
            fragment
        );
    }

    problem
}
