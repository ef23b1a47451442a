//! Login initiation and callback routes

use std::sync::Arc;

use axum::{
    extract::{FromRef, Host, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::Key;
use oauth2::{
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenType,
    },
    reqwest::async_http_client,
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, ExtraTokenFields, RedirectUrl,
    Scope, StandardRevocableToken, StandardTokenResponse, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};

use crate::endpoints::{self, Credentials};
use crate::redirect::{found, sanitize_state};
use crate::session::{SessionAuthenticator, TokenSession};
use crate::settings::OAuthSettings;

/// Extra token-response fields Salesforce returns beyond RFC 6749.
/// `instance_url` is the API host every subsequent call must target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesforceTokenFields {
    pub instance_url: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub issued_at: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

impl ExtraTokenFields for SalesforceTokenFields {}

pub type SalesforceTokenResponse = StandardTokenResponse<SalesforceTokenFields, BasicTokenType>;

type SalesforceOAuthClient = oauth2::Client<
    BasicErrorResponse,
    SalesforceTokenResponse,
    BasicTokenType,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
>;

/// The flow router, nestable under the configured path prefix: login
/// initiation at its root, the provider callback at `/callback`.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Key: FromRef<S>,
    Arc<OAuthSettings>: FromRef<S>,
{
    Router::new()
        .route("/", get(login))
        .route("/callback", get(callback))
}

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub state: Option<String>,
    pub endpoint: Option<String>,
    pub display: Option<String>,
    pub prompt: Option<String>,
    pub scope: Option<String>,
    pub immediate: Option<String>,
}

/// Redirect the browser to the selected endpoint's authorization URL.
///
/// The resume path rides the OAuth `state` parameter; the endpoint host is
/// remembered in a short-lived cookie so the callback can exchange the code
/// against the matching token URL.
pub async fn login(
    State(settings): State<Arc<OAuthSettings>>,
    auth: SessionAuthenticator,
    Host(host): Host,
    headers: HeaderMap,
    Query(params): Query<LoginParams>,
) -> Response {
    let (endpoint_host, credentials) = settings.endpoints.resolve(params.endpoint.as_deref());
    let redirect_uri = callback_url(&headers, &host, &settings.path_prefix);

    let client = match oauth_client(endpoint_host, credentials, &redirect_uri) {
        Ok(client) => client,
        Err(err) => return flow_fault("invalid_endpoint", &err.to_string()),
    };

    let resume = sanitize_state(params.state.as_deref());
    let mut request = client.authorize_url(|| CsrfToken::new(resume));
    for scope in settings.requested_scopes(params.scope.as_deref()) {
        request = request.add_scope(Scope::new(scope));
    }
    request = request.add_extra_param("display", settings.display(params.display.as_deref()));
    if let Some(prompt) = settings.prompt(params.prompt.as_deref()) {
        request = request.add_extra_param("prompt", prompt);
    }
    if settings.immediate(params.immediate.as_deref()) {
        request = request.add_extra_param("immediate", "true");
    }

    let (authorize_url, _state) = request.url();
    let endpoint_host = endpoint_host.to_string();
    let jar = auth.remember_endpoint(&endpoint_host);
    (jar, found(authorize_url.as_str())).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Exchange the authorization code, store the session, and resume at the
/// sanitized state path.
pub async fn callback(
    State(settings): State<Arc<OAuthSettings>>,
    auth: SessionAuthenticator,
    Host(host): Host,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(error) = params.error.as_deref() {
        return flow_fault(
            error,
            params
                .error_description
                .as_deref()
                .unwrap_or("authorization was not granted"),
        );
    }
    let Some(code) = params.code else {
        return flow_fault("invalid_callback", "missing authorization code");
    };

    let pending = auth.pending_endpoint();
    let (endpoint_host, credentials) = settings.endpoints.resolve(pending.as_deref());
    let redirect_uri = callback_url(&headers, &host, &settings.path_prefix);

    let client = match oauth_client(endpoint_host, credentials, &redirect_uri) {
        Ok(client) => client,
        Err(err) => return flow_fault("invalid_endpoint", &err.to_string()),
    };

    let token = match client
        .exchange_code(AuthorizationCode::new(code))
        .request_async(async_http_client)
        .await
    {
        Ok(token) => token,
        Err(err) => return flow_fault("token_exchange_failed", &err.to_string()),
    };

    let session = TokenSession {
        access_token: token.access_token().secret().clone(),
        refresh_token: token.refresh_token().map(|t| t.secret().clone()),
        instance_url: token.extra_fields().instance_url.clone(),
        endpoint: endpoint_host.to_string(),
        issued_at: chrono::Utc::now(),
    };

    let resume = sanitize_state(params.state.as_deref());
    let jar = auth.store(&session);
    (jar, found(&resume)).into_response()
}

/// Revoke a token at the provider. Used by the `Revoke` logout behavior;
/// callers treat failure as non-fatal.
pub async fn revoke_token(session: &TokenSession) -> Result<(), reqwest::Error> {
    reqwest::Client::new()
        .post(endpoints::revoke_url(&session.instance_url))
        .form(&[("token", session.access_token.as_str())])
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// Callback URL derived from the incoming request, honoring the forwarded
/// protocol when behind a TLS-terminating proxy.
fn callback_url(headers: &HeaderMap, host: &str, path_prefix: &str) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    format!("{proto}://{host}{path_prefix}/callback")
}

fn oauth_client(
    host: &str,
    credentials: &Credentials,
    redirect_uri: &str,
) -> Result<SalesforceOAuthClient, url::ParseError> {
    Ok(SalesforceOAuthClient::new(
        ClientId::new(credentials.client_id.clone()),
        Some(ClientSecret::new(credentials.client_secret.clone())),
        AuthUrl::new(endpoints::authorize_url(host))?,
        Some(TokenUrl::new(endpoints::token_url(host))?),
    )
    .set_redirect_uri(RedirectUrl::new(redirect_uri.to_string())?))
}

/// Any fault in the login flow funnels into the generic error-redirect
/// channel, the same one CRM faults use.
fn flow_fault(kind: &str, message: &str) -> Response {
    tracing::error!(kind, message, "login flow fault");

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("title", "Authentication failed");
    query.append_pair("message", message);
    found(&format!("/error?{}", query.finish()))
}
