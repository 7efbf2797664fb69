#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderName, CONTENT_TYPE, WWW_AUTHENTICATE};
use actix_web::http::StatusCode;
use actix_web::test;
use api_test_support::error_body::{assert_error_body_from_parts, ErrorBodyLike};
use serde_json::Value;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    api_test_support::logging::init();
}

/// Assert the error contract for a response and return the parsed body.
///
/// Also checks the header rules defined in `src/error.rs`:
/// - every response carries a non-empty `x-trace-id`
/// - error bodies are JSON
/// - 401 responses carry `WWW-Authenticate: Bearer`
pub async fn assert_error_response<B>(
    resp: ServiceResponse<B>,
    expected_status: u16,
    expected_error: &str,
) -> ErrorBodyLike
where
    B: MessageBody,
{
    let status = resp.status();
    let headers = resp.headers().clone();

    let trace_id = headers
        .get(HeaderName::from_static("x-trace-id"))
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present and valid UTF-8");
    assert!(!trace_id.is_empty(), "x-trace-id header should not be empty");

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/json"),
        "Content-Type must be application/json (got {content_type})"
    );

    if status == StatusCode::UNAUTHORIZED {
        assert_eq!(
            headers.get(WWW_AUTHENTICATE).and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    } else {
        assert!(headers.get(WWW_AUTHENTICATE).is_none());
    }

    let body = test::read_body(resp).await;
    assert_error_body_from_parts(
        status,
        &body,
        StatusCode::from_u16(expected_status).expect("valid status"),
        expected_error,
    )
}

/// Read a successful JSON response body.
pub async fn read_json<B>(resp: ServiceResponse<B>) -> Value
where
    B: MessageBody,
{
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("response body should be JSON")
}
