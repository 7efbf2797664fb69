//! JWKS (JSON Web Key Set) caching.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::VerifyError;

/// Default interval after which the whole key set is re-fetched.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// Minimum gap between refreshes triggered by an unknown key id.
pub const DEFAULT_MIN_REFRESH_GAP: Duration = Duration::from_secs(30);

struct KeyState {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
}

/// Cached signing keys resolved by key id (`kid`).
///
/// Refreshes from the JWKS endpoint when:
/// - the cache has never been filled
/// - the refresh interval has passed
/// - a key id is requested but not found (key rotation), at most once per
///   minimum refresh gap
pub struct JwksCache {
    jwks_uri: Option<String>,
    state: RwLock<KeyState>,
    refresh_interval: Duration,
    min_refresh_gap: Duration,
    /// Serializes fetches so concurrent misses share one request.
    refresh_lock: tokio::sync::Mutex<()>,
    client: reqwest::Client,
}

impl JwksCache {
    /// Create a cache that fetches keys from `jwks_uri` on first use.
    pub fn new(jwks_uri: impl Into<String>) -> Self {
        Self {
            jwks_uri: Some(jwks_uri.into()),
            state: RwLock::new(KeyState {
                keys: HashMap::new(),
                fetched_at: None,
            }),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            min_refresh_gap: DEFAULT_MIN_REFRESH_GAP,
            refresh_lock: tokio::sync::Mutex::new(()),
            client: reqwest::Client::new(),
        }
    }

    /// Create a cache over a fixed key set that never contacts the network.
    pub fn from_key_set(jwks: &JwkSet) -> Self {
        let cache = Self {
            jwks_uri: None,
            ..Self::new(String::new())
        };
        cache.install(jwks);
        cache
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_min_refresh_gap(mut self, gap: Duration) -> Self {
        self.min_refresh_gap = gap;
        self
    }

    /// Get a decoding key by key id, refreshing the key set if needed.
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        let (needs_refresh, seen) = {
            let state = self.state.read();
            let needs_refresh = match state.fetched_at {
                None => true,
                Some(at) if at.elapsed() >= self.refresh_interval => true,
                Some(at) => {
                    if let Some(key) = state.keys.get(kid) {
                        return Ok(key.clone());
                    }
                    at.elapsed() >= self.min_refresh_gap
                }
            };
            (needs_refresh, state.fetched_at)
        };

        if needs_refresh && self.jwks_uri.is_some() {
            let _guard = self.refresh_lock.lock().await;
            // Skip if another caller refreshed while this one waited
            if self.state.read().fetched_at == seen {
                self.refresh().await?;
            }
        }

        self.state
            .read()
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| VerifyError::Invalid(format!("no signing key found for kid '{kid}'")))
    }

    /// Fetch the key set and replace the cached keys.
    pub async fn refresh(&self) -> Result<(), VerifyError> {
        let Some(jwks_uri) = self.jwks_uri.as_deref() else {
            return Ok(());
        };

        debug!(jwks_uri = %jwks_uri, "fetching JWKS");

        let jwks: JwkSet = self
            .client
            .get(jwks_uri)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| VerifyError::KeySet(format!("failed to fetch JWKS: {e}")))?
            .json()
            .await
            .map_err(|e| VerifyError::KeySet(format!("failed to parse JWKS: {e}")))?;

        self.install(&jwks);
        Ok(())
    }

    fn install(&self, jwks: &JwkSet) {
        let mut keys = HashMap::new();
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.as_ref() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(kid.clone(), key);
                }
                Err(e) => warn!(kid = %kid, error = %e, "skipping unusable JWK"),
            }
        }

        let mut state = self.state.write();
        state.keys = keys;
        state.fetched_at = Some(Instant::now());
        debug!(key_count = state.keys.len(), "JWKS cache refreshed");
    }

    /// Get the number of cached keys.
    pub fn len(&self) -> usize {
        self.state.read().keys.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.state.read().keys.is_empty()
    }
}
