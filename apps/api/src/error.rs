use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::verifier::VerifyError;
use crate::errors::ErrorCode;
use crate::trace_ctx;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub details: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {detail}")]
    Unauthorized { detail: String },
    #[error("Invalid token: {detail}")]
    InvalidToken { detail: String },
    #[error("Token expired: {detail}")]
    TokenExpired { detail: String },
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Payload too large: {detail}")]
    PayloadTooLarge { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Error tag written to the `error` field.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::InvalidToken { .. } => ErrorCode::InvalidToken,
            AppError::TokenExpired { .. } => ErrorCode::TokenExpired,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::PayloadTooLarge { .. } => ErrorCode::PayloadTooLarge,
            AppError::Internal { .. } | AppError::Config { .. } => ErrorCode::InternalServerError,
        }
    }

    /// Human-readable summary written to the `message` field.
    pub fn message(&self) -> &'static str {
        match self {
            AppError::Unauthorized { .. } => "No valid authorization token was provided",
            AppError::InvalidToken { .. } => "The provided token is invalid",
            AppError::TokenExpired { .. } => "The provided token has expired",
            AppError::NotFound { .. } => "The requested resource was not found",
            AppError::PayloadTooLarge { .. } => "The request body is too large",
            AppError::Internal { .. } | AppError::Config { .. } => {
                "An unexpected error occurred"
            }
        }
    }

    /// Underlying failure description written to the `details` field.
    pub fn detail(&self) -> &str {
        match self {
            AppError::Unauthorized { detail }
            | AppError::InvalidToken { detail }
            | AppError::TokenExpired { detail }
            | AppError::NotFound { detail }
            | AppError::PayloadTooLarge { detail }
            | AppError::Internal { detail }
            | AppError::Config { detail } => detail,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
            AppError::TokenExpired { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized {
            detail: detail.into(),
        }
    }

    pub fn invalid_token(detail: impl Into<String>) -> Self {
        Self::InvalidToken {
            detail: detail.into(),
        }
    }

    pub fn token_expired(detail: impl Into<String>) -> Self {
        Self::TokenExpired {
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn payload_too_large(detail: impl Into<String>) -> Self {
        Self::PayloadTooLarge {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<VerifyError> for AppError {
    fn from(e: VerifyError) -> Self {
        let detail = e.to_string();
        match e {
            VerifyError::Malformed(_) => AppError::unauthorized(detail),
            VerifyError::Invalid(_) => AppError::invalid_token(detail),
            VerifyError::Expired => AppError::token_expired(detail),
            VerifyError::KeySet(_) => AppError::internal(detail),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::internal(format!("failed to parse JSON body: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(trace_id = %trace_id, error.code = %code, error.details = %detail, "request failed");
        } else {
            warn!(trace_id = %trace_id, error.code = %code, error.details = %detail, "request rejected");
        }

        let body = ErrorBody {
            error: code.as_str().to_string(),
            message: self.message().to_string(),
            details: detail.to_string(),
        };

        let mut builder = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(body)
    }
}
