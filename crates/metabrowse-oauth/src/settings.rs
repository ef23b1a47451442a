//! Login-flow settings
//!
//! Consolidates the knobs the two original deployments of this app forked
//! over: which query-parameter overrides the login initiation honors, and
//! whether logout revokes the token at the provider or only drops the
//! session cookie.

use crate::endpoints::EndpointSet;

/// Session cookie lifetime, in seconds.
pub const SESSION_TTL_SECONDS: i64 = 60 * 60 * 7;

/// What `/unauthenticate` does beyond clearing the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutBehavior {
    /// Drop the session cookie only.
    Clear,
    /// Revoke the token at the provider, then drop the cookie. Revocation
    /// faults are logged and ignored; logout always completes.
    Revoke,
}

/// Which login-initiation query parameters are honored.
#[derive(Debug, Clone, Copy)]
pub struct OverrideFlags {
    pub display: bool,
    pub prompt: bool,
    pub scope: bool,
    pub immediate: bool,
}

impl Default for OverrideFlags {
    fn default() -> Self {
        Self {
            display: true,
            prompt: true,
            scope: true,
            immediate: true,
        }
    }
}

/// Immutable login-flow configuration, built once at startup and shared
/// through the application state.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub endpoints: EndpointSet,
    /// Path the flow router is nested under, e.g. `/auth/salesforce`.
    pub path_prefix: String,
    /// Scopes a `scope` override may request.
    pub scopes: Vec<String>,
    pub default_scopes: Vec<String>,
    /// Display modes a `display` override may request.
    pub displays: Vec<String>,
    pub default_display: String,
    /// Prompt values a `prompt` override may request.
    pub prompts: Vec<String>,
    pub overrides: OverrideFlags,
    pub logout: LogoutBehavior,
    pub session_ttl_seconds: i64,
}

impl OAuthSettings {
    pub fn new(endpoints: EndpointSet) -> Self {
        Self {
            endpoints,
            path_prefix: "/auth/salesforce".to_string(),
            scopes: strings(&[
                "api",
                "chatter_api",
                "full",
                "id",
                "refresh_token",
                "visualforce",
                "web",
            ]),
            default_scopes: strings(&["api", "chatter_api", "id", "refresh_token"]),
            displays: strings(&["page", "popup", "touch", "mobile"]),
            default_display: "page".to_string(),
            prompts: strings(&["login", "consent"]),
            overrides: OverrideFlags::default(),
            logout: LogoutBehavior::Clear,
            session_ttl_seconds: SESSION_TTL_SECONDS,
        }
    }

    /// Path the terms view links to for login initiation.
    pub fn login_path(&self) -> &str {
        &self.path_prefix
    }

    /// Scopes to request: the allow-listed subset of a `scope` override, or
    /// the defaults when the override is disabled, absent, or filters down
    /// to nothing.
    pub fn requested_scopes(&self, raw: Option<&str>) -> Vec<String> {
        if self.overrides.scope {
            if let Some(raw) = raw {
                let requested: Vec<String> = raw
                    .split([' ', ','])
                    .filter(|s| !s.is_empty())
                    .filter(|s| self.scopes.iter().any(|allowed| allowed == s))
                    .map(str::to_string)
                    .collect();
                if !requested.is_empty() {
                    return requested;
                }
            }
        }
        self.default_scopes.clone()
    }

    /// Display mode to send: an allow-listed `display` override, or the
    /// default.
    pub fn display<'a>(&'a self, raw: Option<&'a str>) -> &'a str {
        if self.overrides.display {
            if let Some(requested) = raw {
                if self.displays.iter().any(|d| d == requested) {
                    return requested;
                }
            }
        }
        &self.default_display
    }

    /// Prompt value to send, if an allow-listed override was given.
    pub fn prompt<'a>(&self, raw: Option<&'a str>) -> Option<&'a str> {
        if !self.overrides.prompt {
            return None;
        }
        raw.filter(|requested| self.prompts.iter().any(|p| p == requested))
    }

    /// Whether to send `immediate=true`.
    pub fn immediate(&self, raw: Option<&str>) -> bool {
        self.overrides.immediate && matches!(raw, Some("true") | Some("1"))
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
