use std::sync::Arc;
use std::time::Duration;

use actix_web::http::header;
use actix_web::test;
use futures_util::future::join_all;
use api_test_support::tokens::{
    mint_token, mint_token_with_kid, trusted_jwks, valid_claims, Signer, TEST_AUDIENCE,
    TEST_ISSUER, UNTRUSTED_KID,
};
use serde_json::json;
use sso_api::{AppState, AuthConfig, JwksCache, JwksVerifier, TokenVerifier, VerifyError};

use crate::common::assert_error_response;
use crate::support::create_test_app;
use crate::support::jwks_server::spawn_jwks_server;

fn verifier_for(cache: JwksCache) -> JwksVerifier {
    JwksVerifier::new(Arc::new(cache), TEST_ISSUER, TEST_AUDIENCE)
}

#[actix_web::test]
async fn keys_are_fetched_once_and_cached() {
    let (jwks_uri, endpoint, handle) = spawn_jwks_server(trusted_jwks());
    let verifier = verifier_for(JwksCache::new(jwks_uri));
    let token = mint_token(&valid_claims("user-1"), Signer::Trusted);

    for _ in 0..3 {
        let claims = verifier.verify(&token).await.expect("token should verify");
        assert_eq!(claims.sub, "user-1");
    }
    assert_eq!(endpoint.hits(), 1);

    handle.stop(true).await;
}

#[actix_web::test]
async fn concurrent_cold_start_fetches_once() {
    let (jwks_uri, endpoint, handle) = spawn_jwks_server(trusted_jwks());
    let verifier = verifier_for(JwksCache::new(jwks_uri));
    let token = mint_token(&valid_claims("user-1"), Signer::Trusted);

    let results = join_all((0..8).map(|_| verifier.verify(&token))).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(endpoint.hits(), 1);

    handle.stop(true).await;
}

#[actix_web::test]
async fn unknown_kid_refresh_is_rate_limited() {
    let (jwks_uri, endpoint, handle) = spawn_jwks_server(trusted_jwks());
    let verifier = verifier_for(JwksCache::new(jwks_uri));
    let valid = mint_token(&valid_claims("user-1"), Signer::Trusted);
    let unknown = mint_token_with_kid(&valid_claims("user-1"), Signer::Untrusted, UNTRUSTED_KID);

    verifier.verify(&valid).await.expect("token should verify");
    assert_eq!(endpoint.hits(), 1);

    // Default gap is far longer than the test; the unknown kid must not
    // trigger another fetch.
    for _ in 0..3 {
        assert!(matches!(
            verifier.verify(&unknown).await,
            Err(VerifyError::Invalid(_))
        ));
    }
    assert_eq!(endpoint.hits(), 1);

    handle.stop(true).await;
}

#[actix_web::test]
async fn rotated_key_is_picked_up() {
    let (jwks_uri, endpoint, handle) = spawn_jwks_server(json!({ "keys": [] }));
    let verifier =
        verifier_for(JwksCache::new(jwks_uri).with_min_refresh_gap(Duration::ZERO));
    let token = mint_token(&valid_claims("user-1"), Signer::Trusted);

    assert!(matches!(
        verifier.verify(&token).await,
        Err(VerifyError::Invalid(_))
    ));

    endpoint.publish(trusted_jwks());

    let claims = verifier.verify(&token).await.expect("rotated key should verify");
    assert_eq!(claims.sub, "user-1");
    assert_eq!(endpoint.hits(), 2);

    handle.stop(true).await;
}

#[actix_web::test]
async fn key_set_outage_is_internal_error() {
    let (jwks_uri, endpoint, handle) = spawn_jwks_server(trusted_jwks());
    endpoint.set_failing(true);

    let config = AuthConfig::new(TEST_ISSUER, TEST_AUDIENCE).with_jwks_uri(jwks_uri);
    let app = create_test_app(AppState::from_auth_config(&config)).await;
    let token = mint_token(&valid_claims("user-1"), Signer::Trusted);

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body = assert_error_response(resp, 500, "Internal Server Error").await;
    assert!(body.details.contains("failed to fetch JWKS"));

    handle.stop(true).await;
}

#[actix_web::test]
async fn protected_route_verifies_against_live_endpoint() {
    let (jwks_uri, _endpoint, handle) = spawn_jwks_server(trusted_jwks());

    let config = AuthConfig::new(TEST_ISSUER, TEST_AUDIENCE).with_jwks_uri(jwks_uri);
    let app = create_test_app(AppState::from_auth_config(&config)).await;
    let token = mint_token(&valid_claims("user-7"), Signer::Trusted);

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["sub"], "user-7");

    handle.stop(true).await;
}
