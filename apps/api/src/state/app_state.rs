use std::fmt;
use std::sync::Arc;

use crate::auth::verifier::{JwksVerifier, TokenVerifier};
use crate::state::auth_config::AuthConfig;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Verifier consulted by the `/protected` route
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Create a new AppState around any verifier implementation
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Create an AppState whose verifier fetches keys from the identity provider
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self::new(Arc::new(JwksVerifier::from_config(config)))
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
