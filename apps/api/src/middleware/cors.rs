use actix_cors::Cors;
use actix_web::http::header;

/// Build the CORS middleware.
///
/// Every origin is accepted on every route with the default methods and
/// headers; there is no allow-list at this layer. Browsers may read the
/// trace header so client-side error reports can be correlated with logs.
pub fn cors_middleware() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .expose_headers(vec![header::HeaderName::from_static("x-trace-id")])
        .max_age(3600)
}
