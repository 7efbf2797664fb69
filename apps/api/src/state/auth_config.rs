use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::auth::jwks::DEFAULT_REFRESH_INTERVAL;

/// Identity provider settings the verifier checks tokens against.
///
/// These must match the values the client uses when requesting tokens,
/// otherwise every token is rejected with `Invalid Token`.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Signing key discovery endpoint
    pub jwks_uri: String,
    pub jwks_refresh_interval: Duration,
    /// Accepted signing algorithms (defaults to RS256)
    pub algorithms: Vec<Algorithm>,
}

impl AuthConfig {
    /// Create a config whose JWKS endpoint is derived from the issuer.
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        let issuer = issuer.into();
        let jwks_uri = Self::default_jwks_uri(&issuer);
        Self {
            issuer,
            audience: audience.into(),
            jwks_uri,
            jwks_refresh_interval: DEFAULT_REFRESH_INTERVAL,
            algorithms: vec![Algorithm::RS256],
        }
    }

    pub fn with_jwks_uri(mut self, jwks_uri: impl Into<String>) -> Self {
        self.jwks_uri = jwks_uri.into();
        self
    }

    pub fn with_jwks_refresh_interval(mut self, interval: Duration) -> Self {
        self.jwks_refresh_interval = interval;
        self
    }

    /// Well-known JWKS location under the issuer URL.
    pub fn default_jwks_uri(issuer: &str) -> String {
        format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'))
    }
}
