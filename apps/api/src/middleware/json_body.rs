//! Parses JSON request bodies before routing.
//!
//! Requests declaring a JSON content type have their body buffered, up to
//! the configured limit, and parsed up front. Oversized or malformed bodies
//! are answered here with an error response, so the outer layers (CORS, the
//! access log, the trace header) still see a normal response. The buffered
//! bytes are put back so extractors further down can still read them.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, ResponseError};
use bytes::{Bytes, BytesMut};
use futures_util::future::LocalBoxFuture;
use futures_util::StreamExt;
use tracing::debug;

use crate::config::app::DEFAULT_MAX_JSON_PAYLOAD_SIZE;
use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub struct JsonBody {
    max_size: usize,
}

impl JsonBody {
    /// Accept JSON bodies of at most `max_size` bytes.
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }
}

impl Default for JsonBody {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_JSON_PAYLOAD_SIZE)
    }
}

impl<S, B> Transform<S, ServiceRequest> for JsonBody
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JsonBodyMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JsonBodyMiddleware {
            service: Rc::new(service),
            max_size: self.max_size,
        }))
    }
}

pub struct JsonBodyMiddleware<S> {
    service: Rc<S>,
    max_size: usize,
}

impl<S, B> Service<ServiceRequest> for JsonBodyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let max_size = self.max_size;

        if !is_json(&req) {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        }

        Box::pin(async move {
            let body = match read_json_body(&mut req, max_size).await {
                Ok(body) => body,
                Err(err) => {
                    let res = req.into_response(err.error_response());
                    return Ok(res.map_into_right_body());
                }
            };

            let (_, mut restored) = actix_http::h1::Payload::create(true);
            restored.unread_data(body);
            req.set_payload(restored.into());

            Ok(service.call(req).await?.map_into_left_body())
        })
    }
}

/// Drain the payload, enforcing `max_size`, and check it parses as JSON.
async fn read_json_body(req: &mut ServiceRequest, max_size: usize) -> Result<Bytes, AppError> {
    let too_large = || {
        AppError::payload_too_large(format!(
            "JSON body exceeds the limit of {max_size} bytes"
        ))
    };

    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared.is_some_and(|len| len > max_size) {
        return Err(too_large());
    }

    let mut payload = req.take_payload();
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk =
            chunk.map_err(|e| AppError::internal(format!("failed to read request body: {e}")))?;
        if body.len() + chunk.len() > max_size {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    if !body.is_empty() {
        serde_json::from_slice::<serde_json::Value>(&body)?;
        debug!(bytes = body.len(), "parsed JSON request body");
    }

    Ok(body.freeze())
}

fn is_json(req: &ServiceRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
