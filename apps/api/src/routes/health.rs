//! Liveness probe. Never touches the verifier or the key set.

use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use super::api::timestamp_now;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    app_version: &'static str,
    time: String,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(Health {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        time: timestamp_now(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
