#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::{JwksCache, JwksVerifier, TokenVerifier, UserClaims, VerifyError};
pub use config::Config;
pub use error::{AppError, ErrorBody};
pub use errors::ErrorCode;
pub use extractors::{AuthToken, VerifiedUser};
pub use middleware::{cors_middleware, JsonBody, RequestTrace, StructuredLogger, TraceSpan};
pub use state::{AppState, AuthConfig};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    api_test_support::logging::init();
}
