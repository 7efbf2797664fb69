//! RSA-signed test tokens and the JWKS document that trusts them.
//!
//! Two key pairs live under `keys/`: the trusted pair is published in
//! [`trusted_jwks`], the untrusted pair never is. Tokens are minted with
//! `jsonwebtoken` exactly as an identity provider would issue them.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

pub const TEST_ISSUER: &str = "https://sso-test.example.com/";
pub const TEST_AUDIENCE: &str = "https://api.sso-test.example.com";
pub const TRUSTED_KID: &str = "trusted-test-key";
pub const UNTRUSTED_KID: &str = "untrusted-test-key";

const TRUSTED_PEM: &str = include_str!("../keys/trusted.pem");
const UNTRUSTED_PEM: &str = include_str!("../keys/untrusted.pem");

const TRUSTED_N: &str = "xsFvp0TrCaAdb9aNBIjyLfbb5i0fKI5t5GIJ-aKTF_eG1mgs6-pb6SL_A6ynGkQrj8NDrtAAnyjEjykcRJa_LF2TE4AiR19Xhow6GVSiML13E3K3bWHoOg1d2gevHfCBE8zl03l5arLU8OZT9-iaJykLCJ_zUGbM9WlLnblFnpwH6HD8_PIaAoONWyr4QAUsH8sqtaWTeHmezywQebiWjTIDcw5jeHVeHRzt0gfPXgGZbi2_R6t6UgyHD44zaFtYQNwAcNeGIWljgmO4qlrLElEbpvqz-ri7BzrhFm6N2DPnp7wOtr8N9yFBptikF5mL7Aq34VyZWT_Aqv8rfGZsTw";
const RSA_E: &str = "AQAB";

/// Which private key signs a test token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signer {
    /// Key published in [`trusted_jwks`].
    Trusted,
    /// Key unknown to the verifier.
    Untrusted,
}

impl Signer {
    fn pem(self) -> &'static str {
        match self {
            Signer::Trusted => TRUSTED_PEM,
            Signer::Untrusted => UNTRUSTED_PEM,
        }
    }
}

/// Current time as seconds since the epoch.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs() as i64
}

/// JWKS document publishing the trusted public key under [`TRUSTED_KID`].
pub fn trusted_jwks() -> Value {
    json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": TRUSTED_KID,
            "n": TRUSTED_N,
            "e": RSA_E,
        }]
    })
}

/// Claims accepted by a verifier configured with [`TEST_ISSUER`] and
/// [`TEST_AUDIENCE`], valid for the next hour.
pub fn valid_claims(sub: &str) -> Value {
    let now = now_secs();
    json!({
        "sub": sub,
        "iss": TEST_ISSUER,
        "aud": TEST_AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "scope": "read:messages",
    })
}

/// Claims that expired an hour ago (well beyond any validation leeway).
pub fn expired_claims(sub: &str) -> Value {
    let now = now_secs();
    let mut claims = valid_claims(sub);
    claims["iat"] = json!(now - 7200);
    claims["exp"] = json!(now - 3600);
    claims
}

/// Sign `claims` as an RS256 token whose header carries `kid`.
pub fn mint_token_with_kid(claims: &Value, signer: Signer, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());

    let key = EncodingKey::from_rsa_pem(signer.pem().as_bytes()).expect("test key should parse");
    encode(&header, claims, &key).expect("should mint token successfully")
}

/// Sign `claims` with the trusted key id, using the given private key.
///
/// Signing with [`Signer::Untrusted`] yields a token that claims to come from
/// the trusted key but carries a foreign signature.
pub fn mint_token(claims: &Value, signer: Signer) -> String {
    mint_token_with_kid(claims, signer, TRUSTED_KID)
}

/// Full `Authorization` header value for a valid, trusted token.
pub fn bearer_header(sub: &str) -> String {
    format!("Bearer {}", mint_token(&valid_claims(sub), Signer::Trusted))
}
