//! Error vocabulary for the SSO API.

pub mod error_code;

pub use error_code::ErrorCode;
