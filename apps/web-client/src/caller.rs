//! Calls the public and protected API endpoints and keeps the outcome of each
//! call for rendering.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use reqwest::header::HeaderValue;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::inspector::{inspect_token, DecodedToken};
use crate::session::{AuthSession, SessionError};

pub const NO_TOKEN_MESSAGE: &str = "No access token available. Please get a token first.";
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Public,
    Protected,
}

impl CallKind {
    pub fn path(self) -> &'static str {
        match self {
            CallKind::Public => "/",
            CallKind::Protected => "/protected",
        }
    }
}

/// Why a call produced no result.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("No access token available. Please get a token first.")]
    NoToken,
    /// Non-2xx response; `message` is the body's `message` field if any.
    #[error("Request failed with status code {status}")]
    Status { status: u16, message: Option<String> },
    #[error("{0}")]
    Transport(String),
}

impl CallError {
    /// Text shown to the user in the call's error slot.
    pub fn user_message(&self) -> String {
        match self {
            CallError::Status {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            CallError::Transport(text) if text.is_empty() => FALLBACK_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// A completed call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    pub status: u16,
    pub status_text: String,
    pub body: Value,
    pub timestamp: OffsetDateTime,
}

/// Render state of one call kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallState {
    pub loading: bool,
    pub result: Option<ApiResult>,
    pub error: Option<String>,
}

/// The current access token and its display-only decoded view.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSnapshot {
    pub raw: String,
    pub decoded: Option<DecodedToken>,
}

pub struct ApiCaller<S> {
    session: S,
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<TokenSnapshot>>,
    calls: Mutex<HashMap<CallKind, CallState>>,
}

/// Clears the loading flag of a call however it ends.
struct LoadingGuard<'a> {
    calls: &'a Mutex<HashMap<CallKind, CallState>>,
    kind: CallKind,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.calls.lock().get_mut(&self.kind) {
            state.loading = false;
        }
    }
}

impl<S: AuthSession> ApiCaller<S> {
    pub fn new(session: S, base_url: impl Into<String>) -> Self {
        Self {
            session,
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Fetch a token from the session and keep it with its decoded view.
    ///
    /// A token that does not decode is still kept; it just has no view.
    pub async fn get_token(&self) -> Result<TokenSnapshot, SessionError> {
        let raw = self.session.get_access_token().await?;
        let decoded = match inspect_token(&raw) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(error = %e, "access token could not be decoded for display");
                None
            }
        };

        let snapshot = TokenSnapshot { raw, decoded };
        *self.token.write() = Some(snapshot.clone());
        info!(decoded = snapshot.decoded.is_some(), "access token stored");
        Ok(snapshot)
    }

    pub fn access_token(&self) -> Option<String> {
        self.token.read().as_ref().map(|t| t.raw.clone())
    }

    pub fn decoded_token(&self) -> Option<DecodedToken> {
        self.token.read().as_ref().and_then(|t| t.decoded.clone())
    }

    pub fn state(&self, kind: CallKind) -> CallState {
        self.calls.lock().get(&kind).cloned().unwrap_or_default()
    }

    pub async fn call_public(&self) -> CallState {
        self.call(CallKind::Public).await
    }

    pub async fn call_protected(&self) -> CallState {
        self.call(CallKind::Protected).await
    }

    async fn call(&self, kind: CallKind) -> CallState {
        self.calls.lock().insert(
            kind,
            CallState {
                loading: true,
                ..CallState::default()
            },
        );
        let guard = LoadingGuard {
            calls: &self.calls,
            kind,
        };

        let outcome = self.send(kind).await;
        {
            let mut calls = self.calls.lock();
            let state = calls.entry(kind).or_default();
            match outcome {
                Ok(result) => {
                    debug!(?kind, status = result.status, "API call succeeded");
                    state.result = Some(result);
                }
                Err(e) => {
                    warn!(?kind, error = %e, "API call failed");
                    state.error = Some(e.user_message());
                }
            }
        }

        drop(guard);
        self.state(kind)
    }

    async fn send(&self, kind: CallKind) -> Result<ApiResult, CallError> {
        let mut request = self.client.get(format!("{}{}", self.base_url, kind.path()));

        if kind == CallKind::Protected {
            let token = self.access_token().ok_or(CallError::NoToken)?;
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| CallError::Transport(e.to_string()))?;
            request = request.header(reqwest::header::AUTHORIZATION, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;
        let body = serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text));

        if !status.is_success() {
            return Err(CallError::Status {
                status: status.as_u16(),
                message: body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            });
        }

        Ok(ApiResult {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
            timestamp: OffsetDateTime::now_utc(),
        })
    }
}
