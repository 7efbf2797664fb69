//! Access log for the API.
//!
//! Emits one `request_completed` event per request. The level follows the
//! status class, so rejected tokens show up as warnings and key set outages
//! as errors. The `auth.scheme` field records whether a bearer credential
//! was presented, never the credential itself.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{header, StatusCode};
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::Level;

use super::request_trace::TraceId;

/// Request facts captured before the inner service consumes the request.
struct AccessRecord {
    method: String,
    path: String,
    auth_scheme: &'static str,
    trace_id: String,
    started: Instant,
}

impl AccessRecord {
    fn capture(req: &ServiceRequest) -> Self {
        let auth_scheme = match req.headers().get(header::AUTHORIZATION) {
            None => "none",
            Some(value) => match value.to_str() {
                Ok(v) if v.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("bearer ")) => "bearer",
                _ => "other",
            },
        };

        Self {
            method: req.method().to_string(),
            path: req.path().to_string(),
            auth_scheme,
            trace_id: req
                .extensions()
                .get::<TraceId>()
                .map(|id| id.0.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            started: Instant::now(),
        }
    }

    fn emit(&self, status: StatusCode) {
        let level = if status.is_server_error() {
            Level::ERROR
        } else if status.is_client_error() {
            Level::WARN
        } else {
            Level::INFO
        };

        let record = self;
        // `event!` needs a constant level
        macro_rules! completed {
            ($lvl:expr) => {
                tracing::event!(
                    $lvl,
                    http.method = %record.method,
                    url.path = %record.path,
                    http.status_code = status.as_u16(),
                    auth.scheme = record.auth_scheme,
                    duration_us = record.started.elapsed().as_micros() as u64,
                    trace_id = %record.trace_id,
                    "request_completed"
                )
            };
        }

        match level {
            Level::ERROR => completed!(Level::ERROR),
            Level::WARN => completed!(Level::WARN),
            _ => completed!(Level::INFO),
        }
    }
}

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let record = AccessRecord::capture(&req);
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            record.emit(status);
            result
        })
    }
}
