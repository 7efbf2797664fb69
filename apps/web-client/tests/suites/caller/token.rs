use api_test_support::tokens::{mint_token, valid_claims, Signer, TEST_ISSUER};
use sso_web_client::{ApiCaller, SessionError};
use time::OffsetDateTime;

use crate::support::FakeSession;

#[tokio::test]
async fn get_token_stores_raw_and_decoded_view() {
    let token = mint_token(&valid_claims("user-42"), Signer::Trusted);
    let caller = ApiCaller::new(FakeSession::with_token(token.clone()), "http://unused");

    let snapshot = caller.get_token().await.unwrap();

    assert_eq!(snapshot.raw, token);
    assert_eq!(caller.access_token(), Some(token));
    let decoded = caller.decoded_token().expect("signed JWT should decode");
    assert_eq!(decoded.header["alg"], "RS256");
    assert_eq!(decoded.payload["iss"], TEST_ISSUER);
    assert!(!decoded.is_expired(OffsetDateTime::now_utc()));
}

#[tokio::test]
async fn opaque_token_is_kept_without_view() {
    let caller = ApiCaller::new(FakeSession::with_token("opaque-token"), "http://unused");

    let snapshot = caller.get_token().await.unwrap();

    assert!(snapshot.decoded.is_none());
    assert_eq!(caller.access_token().as_deref(), Some("opaque-token"));
    assert!(caller.decoded_token().is_none());
}

#[tokio::test]
async fn login_required_is_propagated() {
    let caller = ApiCaller::new(FakeSession::logged_out(), "http://unused");

    let err = caller.get_token().await.unwrap_err();

    assert!(matches!(err, SessionError::LoginRequired { .. }));
    assert!(caller.access_token().is_none());
}
