//! Bearer token verification.
//!
//! The API never inspects a token payload on its own: every claim set handed
//! to a handler has passed through a [`TokenVerifier`].

pub mod claims;
pub mod jwks;
pub mod verifier;

pub use claims::{Audience, UserClaims};
pub use jwks::JwksCache;
pub use verifier::{JwksVerifier, TokenVerifier, VerifyError};
