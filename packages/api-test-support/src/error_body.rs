//! Error body test helpers
//!
//! Assertions for the API's stable error contract
//! (`{ "error", "message", "details" }`) that do not depend on API types.

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Local mirror of the API's error body.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBodyLike {
    pub error: String,
    pub message: String,
    pub details: String,
}

/// Assert that raw response parts conform to the error contract and return
/// the parsed body for further checks.
///
/// Validates:
/// - HTTP status matches expected
/// - `error` tag matches expected
/// - `message` and `details` are present and non-empty
pub fn assert_error_body_from_parts(
    status: StatusCode,
    body_bytes: &[u8],
    expected_status: StatusCode,
    expected_error: &str,
) -> ErrorBodyLike {
    assert_eq!(status, expected_status);

    let body_str =
        String::from_utf8(body_bytes.to_vec()).expect("Response body should be valid UTF-8");
    let body: ErrorBodyLike =
        serde_json::from_str(&body_str).expect("Response body should be a valid error body");

    assert_eq!(body.error, expected_error);
    assert!(!body.message.is_empty(), "error message should not be empty");
    assert!(!body.details.is_empty(), "error details should not be empty");

    body
}

