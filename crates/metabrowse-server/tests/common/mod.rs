//! Test utilities for integration tests

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::IntoResponse,
    Router,
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar};
use tower::ServiceExt;

use metabrowse_crm::{Crm, CrmAccess, CrmError};
use metabrowse_oauth::{TokenSession, SESSION_COOKIE};
use metabrowse_server::{config::AppConfig, create_router, state::AppState};

/// In-memory CRM standing in for the REST client.
pub struct MockCrm {
    pub objects: Vec<String>,
    pub fields: BTreeMap<String, String>,
    pub fault: Option<String>,
}

impl Default for MockCrm {
    fn default() -> Self {
        Self {
            objects: vec![
                "Account".to_string(),
                "Contact".to_string(),
                "CustomThing__c".to_string(),
            ],
            fields: BTreeMap::from([
                ("AccountNumber".to_string(), "string".to_string()),
                ("Id".to_string(), "id".to_string()),
                ("Name".to_string(), "string".to_string()),
            ]),
            fault: None,
        }
    }
}

impl MockCrm {
    pub fn failing(message: &str) -> Self {
        Self {
            fault: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), CrmError> {
        match &self.fault {
            Some(message) => Err(CrmError::Api {
                kind: "MOCK_FAULT".to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Crm for MockCrm {
    async fn list_objects(&self, _access: &CrmAccess) -> Result<Vec<String>, CrmError> {
        self.check()?;
        Ok(self.objects.clone())
    }

    async fn describe_object(
        &self,
        _access: &CrmAccess,
        _name: &str,
    ) -> Result<BTreeMap<String, String>, CrmError> {
        self.check()?;
        Ok(self.fields.clone())
    }
}

/// Test application wrapper around the real router with a mock CRM.
pub struct TestApp {
    router: Router,
    key: Key,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_crm(MockCrm::default())
    }

    pub fn with_crm(crm: MockCrm) -> Self {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TOKEN_ENCRYPTION_KEY", "c2l4dGVlbi1ieXRlLWtleQ=="),
            ("CLIENT_ID", "prod-id"),
            ("CLIENT_SECRET", "prod-secret"),
            ("CLIENT_SANDBOX_ID", "sandbox-id"),
            ("CLIENT_SANDBOX_SECRET", "sandbox-secret"),
            ("PORT", "8080"),
        ]);
        let config = AppConfig::from_lookup(|var| env.get(var).map(|v| v.to_string()))
            .expect("test config builds");

        let state = AppState::with_crm(&config, Arc::new(crm));
        let key = state.key.clone();

        Self {
            router: create_router(state),
            key,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Mint the `Cookie` header of a logged-in session, encrypted with the
    /// server's own key.
    pub fn session_cookie(&self) -> String {
        let session = TokenSession {
            access_token: "00Dx0000000BV7z!AR8AQP0jITN80ESE".to_string(),
            refresh_token: None,
            instance_url: "https://na1.salesforce.com".to_string(),
            endpoint: "login.salesforce.com".to_string(),
            issued_at: chrono::Utc::now(),
        };
        let cookie = Cookie::build((
            SESSION_COOKIE,
            serde_json::to_string(&session).expect("session serializes"),
        ))
        .path("/")
        .build();

        let jar = PrivateCookieJar::new(self.key.clone()).add(cookie);
        let response = (jar, ()).into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("jar sets cookie")
            .to_str()
            .expect("cookie is ascii");
        set_cookie
            .split(';')
            .next()
            .expect("cookie has a name=value part")
            .to_string()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.request(Method::GET, uri).await
    }

    pub async fn request(&self, method: Method, uri: &str) -> axum::response::Response {
        self.router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("host", "app.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn get_authenticated(&self, uri: &str) -> axum::response::Response {
        self.router()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header("host", "app.example.com")
                    .header("cookie", self.session_cookie())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// The `Location` header of a redirect response.
pub fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response has a Location header")
        .to_str()
        .expect("location is ascii")
        .to_string()
}

/// Decode one query parameter from a (possibly relative) URL.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Collect a response body as a string.
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}
