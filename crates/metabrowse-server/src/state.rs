//! Application state

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use metabrowse_crm::{Crm, RestCrm};
use metabrowse_oauth::OAuthSettings;

use crate::config::AppConfig;

/// State shared across handlers. Everything here is immutable after
/// startup; the only per-request mutation is the cookie jar.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<OAuthSettings>,
    /// Session-cookie encryption key.
    pub key: Key,
    /// CRM client; a trait object so tests can inject a mock.
    pub crm: Arc<dyn Crm>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_crm(config, Arc::new(RestCrm::new()))
    }

    pub fn with_crm(config: &AppConfig, crm: Arc<dyn Crm>) -> Self {
        Self {
            settings: Arc::new(config.settings.clone()),
            key: cookie_key(&config.token_encryption_key),
            crm,
        }
    }
}

/// Expand configured key material into a cookie key.
///
/// The cookie layer needs 64 bytes of key material; deployments configure
/// keys of varying length, so the decoded bytes are expanded through
/// SHA-512.
pub fn cookie_key(material: &[u8]) -> Key {
    let digest = Sha512::digest(material);
    Key::from(digest.as_slice())
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

impl FromRef<AppState> for Arc<OAuthSettings> {
    fn from_ref(state: &AppState) -> Self {
        state.settings.clone()
    }
}
