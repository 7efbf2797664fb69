use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use super::AuthToken;
use crate::auth::UserClaims;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Claims of a bearer token that passed the configured verifier.
///
/// Handlers taking this extractor only run for verified requests; every
/// rejection is reported through [`AppError`].
#[derive(Debug, Clone)]
pub struct VerifiedUser(pub UserClaims);

impl VerifiedUser {
    pub fn into_inner(self) -> UserClaims {
        self.0
    }
}

impl FromRequest for VerifiedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = AuthToken::from_headers(req);
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let token = token?;
            let app_state =
                app_state.ok_or_else(|| AppError::internal("AppState not available"))?;

            let claims = app_state.verifier.verify(&token.token).await?;
            Ok(VerifiedUser(claims))
        })
    }
}
