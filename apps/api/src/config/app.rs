//! Centralized application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::error::AppError;
use crate::state::auth_config::AuthConfig;

pub const DEFAULT_PORT: u16 = 3000;

/// Largest JSON request body accepted when `MAX_JSON_PAYLOAD_SIZE` is unset.
pub const DEFAULT_MAX_JSON_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Centralized application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub port: u16,

    // HTTP payload limits
    pub max_json_payload_size: usize,

    // Identity provider configuration
    pub auth: AuthConfig,
}

impl Config {
    /// Load and validate all configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("API_PORT") {
            Ok(port_str) => port_str.parse::<u16>().map_err(|_| {
                AppError::config(format!(
                    "API_PORT must be a valid port number, got '{port_str}'"
                ))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let max_json_payload_size = match optional_env("MAX_JSON_PAYLOAD_SIZE") {
            Some(size) => size.parse::<usize>().map_err(|_| {
                AppError::config(format!(
                    "MAX_JSON_PAYLOAD_SIZE must be a number of bytes, got '{size}'"
                ))
            })?,
            None => DEFAULT_MAX_JSON_PAYLOAD_SIZE,
        };

        let issuer = required_env("AUTH_ISSUER")?;
        let audience = required_env("AUTH_AUDIENCE")?;
        let mut auth = AuthConfig::new(issuer, audience);

        if let Some(jwks_uri) = optional_env("AUTH_JWKS_URI") {
            auth = auth.with_jwks_uri(jwks_uri);
        }

        if let Some(secs) = optional_env("AUTH_JWKS_REFRESH_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "AUTH_JWKS_REFRESH_SECS must be a number of seconds, got '{secs}'"
                ))
            })?;
            auth = auth.with_jwks_refresh_interval(Duration::from_secs(secs));
        }

        Ok(Config {
            host,
            port,
            max_json_payload_size,
            auth,
        })
    }
}

fn required_env(name: &str) -> Result<String, AppError> {
    optional_env(name).ok_or_else(|| AppError::config(format!("{name} must be set")))
}

/// Read a variable, treating blank values as unset.
fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
