use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::AppError;

/// Raw bearer credential extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
}

impl AuthToken {
    /// Parse `Authorization: Bearer <token>` from the request.
    pub fn from_headers(req: &HttpRequest) -> Result<Self, AppError> {
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let auth_value = auth_header
            .to_str()
            .map_err(|_| AppError::unauthorized("Missing or invalid Authorization header"))?;

        // Parse "Bearer <token>" format
        let parts: Vec<&str> = auth_value.split_whitespace().collect();
        if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("Bearer") {
            return Err(AppError::unauthorized("Missing or invalid Bearer token"));
        }

        Ok(AuthToken {
            token: parts[1].to_string(),
        })
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}
