//! Auth session bridge.
//!
//! [`AuthSession`] is the only surface the rest of the client sees of the
//! identity provider. [`RedirectSession`] implements it with full-page
//! redirects for login/logout and a pluggable [`SilentRenewer`] for fetching
//! tokens without user interaction.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Url;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::inspector::inspect_token;

/// Cached tokens this close to expiry are renewed instead of reused.
pub const EXPIRY_LEEWAY: Duration = Duration::from_secs(60);

pub const DEFAULT_SCOPE: &str = "openid profile email";

#[derive(Debug, Error)]
pub enum SessionError {
    /// Silent renewal is impossible; the user must be sent to `login_url`.
    #[error("login required")]
    LoginRequired { login_url: Url },
    #[error("silent token renewal failed: {0}")]
    Renewal(String),
    #[error("invalid session configuration: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum RenewError {
    #[error("user interaction required")]
    InteractionRequired,
    #[error("{0}")]
    Failed(String),
}

#[async_trait]
pub trait AuthSession: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// URL of the identity provider's login page to redirect the browser to.
    fn login(&self) -> Result<Url, SessionError>;

    /// Forget the session locally and return the provider's logout URL.
    fn logout(&self) -> Result<Url, SessionError>;

    /// Current access token, renewed silently when the cached one is stale.
    async fn get_access_token(&self) -> Result<String, SessionError>;
}

/// Obtains a fresh access token without user interaction.
#[async_trait]
pub trait SilentRenewer: Send + Sync {
    async fn renew(&self, config: &ClientConfig) -> Result<String, RenewError>;
}

/// Session backed by redirect login and silent renewal.
pub struct RedirectSession<R> {
    config: ClientConfig,
    renewer: R,
    token: RwLock<Option<String>>,
}

impl<R: SilentRenewer> RedirectSession<R> {
    pub fn new(config: ClientConfig, renewer: R) -> Self {
        Self {
            config,
            renewer,
            token: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Cached token if it is still usable.
    ///
    /// Opaque tokens that cannot be decoded are reused until logout.
    fn cached_token(&self, now: OffsetDateTime) -> Option<String> {
        let token = self.token.read().clone()?;
        match inspect_token(&token) {
            Ok(decoded) => match decoded.expires_in(now) {
                Some(left) if left <= EXPIRY_LEEWAY => None,
                _ => Some(token),
            },
            Err(_) => Some(token),
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, SessionError> {
        let base = format!("{}{path}", self.config.authority());
        Url::parse_with_params(&base, params).map_err(|e| SessionError::Config(e.to_string()))
    }
}

#[async_trait]
impl<R: SilentRenewer> AuthSession for RedirectSession<R> {
    fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    fn login(&self) -> Result<Url, SessionError> {
        let state = Uuid::new_v4().to_string();
        self.endpoint(
            "/authorize",
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("audience", self.config.audience.as_str()),
                ("scope", DEFAULT_SCOPE),
                ("state", state.as_str()),
            ],
        )
    }

    fn logout(&self) -> Result<Url, SessionError> {
        self.token.write().take();
        info!("session cleared");
        self.endpoint(
            "/v2/logout",
            &[
                ("client_id", self.config.client_id.as_str()),
                ("returnTo", self.config.redirect_uri.as_str()),
            ],
        )
    }

    async fn get_access_token(&self) -> Result<String, SessionError> {
        if let Some(token) = self.cached_token(OffsetDateTime::now_utc()) {
            debug!("reusing cached access token");
            return Ok(token);
        }

        match self.renewer.renew(&self.config).await {
            Ok(token) => {
                debug!("access token renewed silently");
                *self.token.write() = Some(token.clone());
                Ok(token)
            }
            Err(RenewError::InteractionRequired) => {
                warn!("silent renewal impossible, falling back to interactive login");
                Err(SessionError::LoginRequired {
                    login_url: self.login()?,
                })
            }
            Err(RenewError::Failed(reason)) => Err(SessionError::Renewal(reason)),
        }
    }
}

/// Renewer that picks up a token handed over out of band through an
/// environment variable (`SSO_ACCESS_TOKEN` by default).
#[derive(Debug, Clone)]
pub struct EnvTokenRenewer {
    var: String,
}

impl EnvTokenRenewer {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenRenewer {
    fn default() -> Self {
        Self::new("SSO_ACCESS_TOKEN")
    }
}

#[async_trait]
impl SilentRenewer for EnvTokenRenewer {
    async fn renew(&self, _config: &ClientConfig) -> Result<String, RenewError> {
        std::env::var(&self.var)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(RenewError::InteractionRequired)
    }
}
