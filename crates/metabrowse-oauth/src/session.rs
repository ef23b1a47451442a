//! Encrypted cookie session and the authenticator capability

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::OAuthSettings;

/// Cookie holding the encrypted, serialized token session.
pub const SESSION_COOKIE: &str = "mb_token";

/// Cookie remembering which endpoint a login was initiated against, so the
/// callback exchanges the code at the matching token URL. Short-lived.
pub const PENDING_COOKIE: &str = "mb_login";

const PENDING_TTL_SECONDS: i64 = 60 * 10;

/// The token state carried by an authenticated session.
///
/// Serialized with serde and encrypted into [`SESSION_COOKIE`]; route
/// handlers never look inside beyond handing the access data to the CRM
/// client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// API host the token is valid against, from the token response.
    pub instance_url: String,
    /// Login host that issued the token.
    pub endpoint: String,
    pub issued_at: DateTime<Utc>,
}

/// Capability object for session state, extracted per request.
///
/// A cookie that is absent, fails decryption, or fails deserialization all
/// read as "not authenticated".
pub struct SessionAuthenticator {
    jar: PrivateCookieJar,
    settings: Arc<OAuthSettings>,
}

impl SessionAuthenticator {
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// The current session, if one decrypts and deserializes.
    pub fn session(&self) -> Option<TokenSession> {
        self.jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
    }

    /// Store a fresh session, dropping any pending-login marker.
    pub fn store(self, session: &TokenSession) -> PrivateCookieJar {
        let value = match serde_json::to_string(session) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize token session");
                return self.jar;
            }
        };

        let cookie = Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.settings.session_ttl_seconds))
            .build();

        self.jar.remove(removal(PENDING_COOKIE)).add(cookie)
    }

    /// Drop the session cookie. A no-op (that still returns a valid jar)
    /// when no session exists.
    pub fn clear(self) -> PrivateCookieJar {
        self.jar.remove(removal(SESSION_COOKIE))
    }

    /// Remember the endpoint host a login was initiated against.
    pub fn remember_endpoint(self, host: &str) -> PrivateCookieJar {
        let cookie = Cookie::build((PENDING_COOKIE, host.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(PENDING_TTL_SECONDS))
            .build();
        self.jar.add(cookie)
    }

    /// Endpoint host recorded at login initiation, if any.
    pub fn pending_endpoint(&self) -> Option<String> {
        self.jar
            .get(PENDING_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }

    pub fn settings(&self) -> &Arc<OAuthSettings> {
        &self.settings
    }
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionAuthenticator
where
    S: Send + Sync,
    Key: FromRef<S>,
    Arc<OAuthSettings>: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_request_parts(parts, state).await?;
        let settings = Arc::<OAuthSettings>::from_ref(state);
        Ok(Self { jar, settings })
    }
}
