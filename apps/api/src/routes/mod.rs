use actix_web::{web, HttpRequest};

use crate::error::AppError;

pub mod api;
pub mod health;

/// Configure application routes.
///
/// `main.rs` and the test harness both mount these under the same
/// middleware stack; unmatched paths fall through to [`not_found`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(api::configure_routes)
        .configure(health::configure_routes)
        .default_service(web::to(not_found));
}

async fn not_found(req: HttpRequest) -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::not_found(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}
