use actix_web::http::header;
use actix_web::test;

use sso_api::JsonBody;

use crate::common::{assert_error_response, read_json};
use crate::support::{create_test_app, create_test_app_with, static_keys_state};

#[actix_web::test]
async fn malformed_json_body_fails_fast() {
    let app = create_test_app(static_keys_state()).await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"broken\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body = assert_error_response(resp, 500, "Internal Server Error").await;
    assert!(body.details.contains("failed to parse JSON body"));
}

#[actix_web::test]
async fn malformed_json_is_rejected_before_authentication() {
    let app = create_test_app(static_keys_state()).await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header((header::CONTENT_TYPE, "application/json; charset=utf-8"))
        .set_payload("not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error_response(resp, 500, "Internal Server Error").await;
}

#[actix_web::test]
async fn well_formed_json_body_reaches_handler() {
    let app = create_test_app(static_keys_state()).await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"hello\": \"world\"}")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(read_json(resp).await["status"], "public");
}

#[actix_web::test]
async fn non_json_bodies_are_left_alone() {
    let app = create_test_app(static_keys_state()).await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("{ definitely not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn oversized_json_body_is_rejected() {
    let app = create_test_app_with(static_keys_state(), JsonBody::new(64)).await;
    let body = format!("{{\"padding\": \"{}\"}}", "x".repeat(128));

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body = assert_error_response(resp, 413, "Payload Too Large").await;
    assert!(body.details.contains("64 bytes"));
}

#[actix_web::test]
async fn json_body_within_limit_is_accepted() {
    let app = create_test_app_with(static_keys_state(), JsonBody::new(64)).await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"hello\": \"world\"}")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn limit_only_applies_to_json_bodies() {
    let app = create_test_app_with(static_keys_state(), JsonBody::new(64)).await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("x".repeat(1024))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
}
