//! Startup configuration
//!
//! All required variables are validated together so a misconfigured
//! deployment learns about every missing name in one failure, not one per
//! restart.

use base64::Engine;
use thiserror::Error;

use metabrowse_oauth::{
    Credentials, EndpointSet, LogoutBehavior, OAuthSettings, PRODUCTION_HOST, SANDBOX_HOST,
};

/// Environment variables the process refuses to start without.
pub const REQUIRED_VARS: [&str; 6] = [
    "TOKEN_ENCRYPTION_KEY",
    "CLIENT_ID",
    "CLIENT_SECRET",
    "CLIENT_SANDBOX_ID",
    "CLIENT_SANDBOX_SECRET",
    "PORT",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Immutable process configuration, built once in `main` and shared through
/// the application state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Decoded key material for session-cookie encryption.
    pub token_encryption_key: Vec<u8>,
    pub port: u16,
    pub settings: OAuthSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Integration tests use a map here to
    /// avoid mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|var| lookup(var).map_or(true, |value| value.is_empty()))
            .map(|var| var.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        // Present and non-empty after the check above.
        let get = |var: &str| lookup(var).unwrap_or_default();

        let token_encryption_key = base64::engine::general_purpose::STANDARD
            .decode(get("TOKEN_ENCRYPTION_KEY"))
            .map_err(|err| ConfigError::Invalid {
                var: "TOKEN_ENCRYPTION_KEY".to_string(),
                reason: format!("not valid base64: {err}"),
            })?;

        let port: u16 = get("PORT").parse().map_err(|_| ConfigError::Invalid {
            var: "PORT".to_string(),
            reason: "not a port number".to_string(),
        })?;

        let mut endpoints = EndpointSet::new(
            PRODUCTION_HOST,
            Credentials {
                client_id: get("CLIENT_ID"),
                client_secret: get("CLIENT_SECRET"),
            },
        );
        endpoints.insert(
            SANDBOX_HOST,
            Credentials {
                client_id: get("CLIENT_SANDBOX_ID"),
                client_secret: get("CLIENT_SANDBOX_SECRET"),
            },
        );

        let mut settings = OAuthSettings::new(endpoints);
        settings.logout = match lookup("METABROWSE_LOGOUT").as_deref() {
            None | Some("clear") => LogoutBehavior::Clear,
            Some("revoke") => LogoutBehavior::Revoke,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "METABROWSE_LOGOUT".to_string(),
                    reason: format!("expected \"clear\" or \"revoke\", got {other:?}"),
                })
            }
        };
        settings.overrides.display = flag(&lookup, "METABROWSE_DISPLAY_OVERRIDE");
        settings.overrides.prompt = flag(&lookup, "METABROWSE_PROMPT_OVERRIDE");
        settings.overrides.scope = flag(&lookup, "METABROWSE_SCOPE_OVERRIDE");
        settings.overrides.immediate = flag(&lookup, "METABROWSE_IMMEDIATE_OVERRIDE");

        Ok(Self {
            token_encryption_key,
            port,
            settings,
        })
    }
}

/// Boolean flag: enabled unless explicitly switched off.
fn flag(lookup: impl Fn(&str) -> Option<String>, var: &str) -> bool {
    !matches!(
        lookup(var).as_deref(),
        Some("0") | Some("false") | Some("off") | Some("no")
    )
}
