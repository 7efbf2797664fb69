//! Client configuration injected from the environment.

use std::env;

use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Identity provider and API settings.
///
/// `domain`, `client_id`, `audience` and `redirect_uri` must be non-empty;
/// nothing else is checked until the values are used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub domain: String,
    pub client_id: String,
    pub audience: String,
    pub redirect_uri: String,
    pub api_base_url: String,
}

impl ClientConfig {
    pub fn new(
        domain: impl Into<String>,
        client_id: impl Into<String>,
        audience: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            domain: domain.into(),
            client_id: client_id.into(),
            audience: audience.into(),
            redirect_uri: redirect_uri.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Load from `SSO_DOMAIN`, `SSO_CLIENT_ID`, `SSO_AUDIENCE`,
    /// `SSO_REDIRECT_URI` and optionally `API_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::new(
            env_or_empty("SSO_DOMAIN"),
            env_or_empty("SSO_CLIENT_ID"),
            env_or_empty("SSO_AUDIENCE"),
            env_or_empty("SSO_REDIRECT_URI"),
        )?;

        let api_base_url = env_or_empty("API_BASE_URL");
        if api_base_url.is_empty() {
            Ok(config)
        } else {
            Ok(config.with_api_base_url(api_base_url))
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("SSO_DOMAIN", &self.domain),
            ("SSO_CLIENT_ID", &self.client_id),
            ("SSO_AUDIENCE", &self.audience),
            ("SSO_REDIRECT_URI", &self.redirect_uri),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }
        Ok(())
    }

    /// Base URL of the identity provider, with a scheme and no trailing slash.
    pub fn authority(&self) -> String {
        let domain = self.domain.trim().trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }
}

fn env_or_empty(name: &str) -> String {
    env::var(name).map(|v| v.trim().to_string()).unwrap_or_default()
}
