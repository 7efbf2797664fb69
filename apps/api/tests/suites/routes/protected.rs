use actix_web::http::header;
use actix_web::test;
use api_test_support::tokens::{
    bearer_header, expired_claims, mint_token, mint_token_with_kid, valid_claims, Signer,
    TEST_ISSUER, UNTRUSTED_KID,
};
use serde_json::json;

use crate::common::{assert_error_response, read_json};
use crate::support::{create_test_app, static_keys_state};

fn protected_with(authorization: Option<String>) -> actix_http::Request {
    let mut req = test::TestRequest::get().uri("/protected");
    if let Some(value) = authorization {
        req = req.insert_header((header::AUTHORIZATION, value));
    }
    req.to_request()
}

#[actix_web::test]
async fn valid_token_returns_verified_claims() {
    let app = create_test_app(static_keys_state()).await;

    let resp = test::call_service(&app, protected_with(Some(bearer_header("user-42")))).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body = read_json(resp).await;
    assert_eq!(body["status"], "authenticated");
    assert!(body["message"].as_str().unwrap().contains("protected endpoint"));
    assert_eq!(body["user"]["sub"], "user-42");
    assert_eq!(body["user"]["iss"], TEST_ISSUER);
    assert_eq!(body["user"]["scope"], "read:messages");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn missing_header_is_unauthorized() {
    let app = create_test_app(static_keys_state()).await;

    let resp = test::call_service(&app, protected_with(None)).await;

    let body = assert_error_response(resp, 401, "Unauthorized").await;
    assert_eq!(body.details, "Missing Authorization header");
}

#[actix_web::test]
async fn malformed_credentials_are_unauthorized() {
    let app = create_test_app(static_keys_state()).await;

    for value in ["Token abc", "Bearer", "Bearer only.two", "Bearer a.b.c.d"] {
        let resp = test::call_service(&app, protected_with(Some(value.to_string()))).await;
        assert_error_response(resp, 401, "Unauthorized").await;
    }
}

#[actix_web::test]
async fn expired_token_is_rejected() {
    let app = create_test_app(static_keys_state()).await;
    let token = mint_token(&expired_claims("user-1"), Signer::Trusted);

    let resp = test::call_service(&app, protected_with(Some(format!("Bearer {token}")))).await;

    let body = assert_error_response(resp, 401, "Token Expired").await;
    assert_eq!(body.details, "jwt expired");
}

#[actix_web::test]
async fn untrusted_signature_is_invalid() {
    let app = create_test_app(static_keys_state()).await;
    let forged = mint_token(&valid_claims("user-1"), Signer::Untrusted);
    let unknown_kid = mint_token_with_kid(&valid_claims("user-1"), Signer::Untrusted, UNTRUSTED_KID);

    for token in [forged, unknown_kid] {
        let resp =
            test::call_service(&app, protected_with(Some(format!("Bearer {token}")))).await;
        assert_error_response(resp, 401, "Invalid Token").await;
    }
}

#[actix_web::test]
async fn mismatched_audience_or_issuer_is_invalid() {
    let app = create_test_app(static_keys_state()).await;

    let mut wrong_aud = valid_claims("user-1");
    wrong_aud["aud"] = json!("https://another-api.example.com");
    let mut wrong_iss = valid_claims("user-1");
    wrong_iss["iss"] = json!("https://another-tenant.example.com/");

    for claims in [wrong_aud, wrong_iss] {
        let token = mint_token(&claims, Signer::Trusted);
        let resp =
            test::call_service(&app, protected_with(Some(format!("Bearer {token}")))).await;
        assert_error_response(resp, 401, "Invalid Token").await;
    }
}

#[actix_web::test]
async fn garbage_segments_are_invalid() {
    let app = create_test_app(static_keys_state()).await;

    let resp = test::call_service(
        &app,
        protected_with(Some("Bearer not.a.jwt".to_string())),
    )
    .await;

    assert_error_response(resp, 401, "Invalid Token").await;
}
