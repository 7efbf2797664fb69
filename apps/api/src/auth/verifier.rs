//! Token verifier trait and JWKS-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use thiserror::Error;
use tracing::debug;

use super::{JwksCache, UserClaims};
use crate::state::auth_config::AuthConfig;

/// Why a bearer token was rejected.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The credential is not structurally a JWT.
    #[error("{0}")]
    Malformed(String),
    /// Signature, key, issuer, audience or other claim mismatch.
    #[error("{0}")]
    Invalid(String),
    /// The `exp` claim is in the past.
    #[error("jwt expired")]
    Expired,
    /// The signing key set could not be fetched or parsed.
    #[error("{0}")]
    KeySet(String),
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            _ => VerifyError::Invalid(err.to_string()),
        }
    }
}

/// Validates raw bearer tokens and yields the verified claim set.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<UserClaims, VerifyError>;
}

/// JWT verifier resolving signing keys from a cached JWKS endpoint.
///
/// Checks the signature and the `iss`, `aud`, `exp` and `nbf` claims.
/// Failures are never cached: every call re-verifies from scratch.
pub struct JwksVerifier {
    keys: Arc<JwksCache>,
    validation: Validation,
}

impl JwksVerifier {
    pub fn new(keys: Arc<JwksCache>, issuer: &str, audience: &str) -> Self {
        Self::with_algorithms(keys, issuer, audience, &[Algorithm::RS256])
    }

    pub fn with_algorithms(
        keys: Arc<JwksCache>,
        issuer: &str,
        audience: &str,
        algorithms: &[Algorithm],
    ) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = algorithms.to_vec();
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self { keys, validation }
    }

    /// Build a verifier that fetches keys from the configured JWKS endpoint.
    pub fn from_config(config: &AuthConfig) -> Self {
        let keys = JwksCache::new(config.jwks_uri.clone())
            .with_refresh_interval(config.jwks_refresh_interval);
        Self::with_algorithms(
            Arc::new(keys),
            &config.issuer,
            &config.audience,
            &config.algorithms,
        )
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<UserClaims, VerifyError> {
        if token.split('.').count() != 3 {
            return Err(VerifyError::Malformed("jwt malformed".to_string()));
        }

        let header = decode_header(token)
            .map_err(|e| VerifyError::Invalid(format!("invalid token header: {e}")))?;
        let kid = header
            .kid
            .ok_or_else(|| VerifyError::Invalid("token header has no kid".to_string()))?;

        let key = self.keys.get_key(&kid).await?;
        let data = decode::<UserClaims>(token, &key, &self.validation)?;

        debug!(sub = %data.claims.sub, kid = %kid, "token verified");
        Ok(data.claims)
    }
}
