//! Verified claim set forwarded to handlers and echoed back as `user`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims of a token that passed verification.
///
/// Registered claims are typed; everything else the identity provider put in
/// the payload (scopes, permissions, namespaced custom claims) is preserved
/// verbatim in `custom` and serialized back at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserClaims {
    /// Subject (user or client identifier)
    pub sub: String,
    pub iss: String,
    pub aud: Audience,
    /// Issued-at (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

/// The `aud` claim: a single audience or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}
