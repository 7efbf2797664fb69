//! The public and the token-protected endpoint.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::UserClaims;
use crate::error::AppError;
use crate::extractors::VerifiedUser;

pub const PUBLIC_MESSAGE: &str =
    "Hello from a public endpoint! You don't need to be authenticated to see this.";
pub const PROTECTED_MESSAGE: &str =
    "Hello from a protected endpoint! You need to be authenticated to see this.";

/// Response envelope shared by both endpoints.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope {
    pub message: String,
    pub status: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserClaims>,
}

impl ApiEnvelope {
    fn public() -> Self {
        Self {
            message: PUBLIC_MESSAGE.to_string(),
            status: "public",
            timestamp: timestamp_now(),
            user: None,
        }
    }

    fn authenticated(user: UserClaims) -> Self {
        Self {
            message: PROTECTED_MESSAGE.to_string(),
            status: "authenticated",
            timestamp: timestamp_now(),
            user: Some(user),
        }
    }
}

/// Current UTC time as ISO 8601 with millisecond precision.
pub fn timestamp_now() -> String {
    let format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    OffsetDateTime::now_utc()
        .format(format)
        .unwrap_or_else(|_| "unknown".to_string())
}

async fn public() -> Result<HttpResponse, AppError> {
    info!("public endpoint accessed");
    Ok(HttpResponse::Ok().json(ApiEnvelope::public()))
}

async fn protected(user: VerifiedUser) -> Result<HttpResponse, AppError> {
    let claims = user.into_inner();
    info!(sub = %claims.sub, "protected endpoint accessed");
    Ok(HttpResponse::Ok().json(ApiEnvelope::authenticated(claims)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(public))
        .route("/protected", web::get().to(protected));
}
