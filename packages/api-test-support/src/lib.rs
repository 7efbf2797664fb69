//! API test support utilities
//!
//! This crate provides utilities shared by the API and web-client test suites,
//! including unified logging initialization, RSA-signed test tokens with a
//! matching JWKS document, and error body assertions.

pub mod error_body;
pub mod logging;
pub mod tokens;
