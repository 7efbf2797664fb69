//! Error tags for the SSO API.
//!
//! Every error response carries exactly one of these tags in its `error`
//! field. Clients branch on the tag, so the strings are part of the public
//! contract and must never change.

use core::fmt;

/// Stable error tags written to the `error` field of error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Missing or malformed credential
    Unauthorized,
    /// Signature, issuer, audience or key mismatch
    InvalidToken,
    /// Token `exp` is in the past
    TokenExpired,
    /// No route matched the request
    NotFound,
    /// Request body over the configured limit
    PayloadTooLarge,
    /// Any other failure
    InternalServerError,
}

impl ErrorCode {
    /// Get the tag as it appears in HTTP responses.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::InvalidToken => "Invalid Token",
            Self::TokenExpired => "Token Expired",
            Self::NotFound => "Not Found",
            Self::PayloadTooLarge => "Payload Too Large",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
