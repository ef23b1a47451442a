//! Named API endpoints and their credential pairs

use std::collections::HashMap;

/// Default production login host.
pub const PRODUCTION_HOST: &str = "login.salesforce.com";

/// Sandbox login host.
pub const SANDBOX_HOST: &str = "test.salesforce.com";

/// One OAuth2 client credential pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// The set of named endpoints a user may log in against.
///
/// Lookup never fails: an unknown or absent host resolves to the default
/// endpoint, so a tampered `endpoint` query parameter degrades to the
/// production login rather than an error.
#[derive(Debug, Clone)]
pub struct EndpointSet {
    default_host: String,
    default_credentials: Credentials,
    extra: HashMap<String, Credentials>,
}

impl EndpointSet {
    pub fn new(default_host: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            default_host: default_host.into(),
            default_credentials: credentials,
            extra: HashMap::new(),
        }
    }

    pub fn insert(&mut self, host: impl Into<String>, credentials: Credentials) {
        self.extra.insert(host.into(), credentials);
    }

    pub fn default_host(&self) -> &str {
        &self.default_host
    }

    /// Resolve a requested host to a known endpoint, falling back to the
    /// default for unknown or absent hosts.
    pub fn resolve(&self, host: Option<&str>) -> (&str, &Credentials) {
        if let Some(requested) = host {
            if requested == self.default_host {
                return (&self.default_host, &self.default_credentials);
            }
            if let Some((known, credentials)) = self.extra.get_key_value(requested) {
                return (known.as_str(), credentials);
            }
        }
        (&self.default_host, &self.default_credentials)
    }
}

/// Authorization endpoint URL for a login host.
pub fn authorize_url(host: &str) -> String {
    format!("https://{host}/services/oauth2/authorize")
}

/// Token endpoint URL for a login host.
pub fn token_url(host: &str) -> String {
    format!("https://{host}/services/oauth2/token")
}

/// Token revocation endpoint URL for an instance.
pub fn revoke_url(instance_url: &str) -> String {
    format!(
        "{}/services/oauth2/revoke",
        instance_url.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EndpointSet {
        let mut set = EndpointSet::new(
            PRODUCTION_HOST,
            Credentials {
                client_id: "prod-id".into(),
                client_secret: "prod-secret".into(),
            },
        );
        set.insert(
            SANDBOX_HOST,
            Credentials {
                client_id: "sandbox-id".into(),
                client_secret: "sandbox-secret".into(),
            },
        );
        set
    }

    #[test]
    fn resolves_known_host() {
        let set = sample();
        let (host, credentials) = set.resolve(Some(SANDBOX_HOST));
        assert_eq!(host, SANDBOX_HOST);
        assert_eq!(credentials.client_id, "sandbox-id");
    }

    #[test]
    fn unknown_host_falls_back_to_default() {
        let set = sample();
        let (host, credentials) = set.resolve(Some("evil.example.com"));
        assert_eq!(host, PRODUCTION_HOST);
        assert_eq!(credentials.client_id, "prod-id");
    }

    #[test]
    fn absent_host_uses_default() {
        let set = sample();
        let (host, _) = set.resolve(None);
        assert_eq!(host, PRODUCTION_HOST);
    }

    #[test]
    fn endpoint_urls() {
        assert_eq!(
            authorize_url(PRODUCTION_HOST),
            "https://login.salesforce.com/services/oauth2/authorize"
        );
        assert_eq!(
            revoke_url("https://na1.salesforce.com/"),
            "https://na1.salesforce.com/services/oauth2/revoke"
        );
    }
}
