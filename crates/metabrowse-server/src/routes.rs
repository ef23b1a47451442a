//! HTTP route handlers

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::Uri,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use metabrowse_crm::{CrmAccess, CrmError};
use metabrowse_oauth::{found, sanitize_state, LogoutBehavior, SessionAuthenticator, TokenSession};

use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct AuthenticateParams {
    pub state: Option<String>,
}

/// `GET /authenticate`: show the terms/login view, or resume at the
/// sanitized state path when a session already exists.
pub async fn authenticate(
    State(state): State<AppState>,
    auth: SessionAuthenticator,
    Query(params): Query<AuthenticateParams>,
) -> Response {
    if auth.is_authenticated() {
        return found(&sanitize_state(params.state.as_deref()));
    }
    Html(views::terms_with_login(
        state.settings.login_path(),
        params.state.as_deref(),
    ))
    .into_response()
}

/// `GET /unauthenticate`: drop the session and go home. Idempotent; calling
/// without a session still redirects.
pub async fn unauthenticate(State(state): State<AppState>, auth: SessionAuthenticator) -> Response {
    if state.settings.logout == LogoutBehavior::Revoke {
        if let Some(session) = auth.session() {
            if let Err(err) = metabrowse_oauth::flow::revoke_token(&session).await {
                tracing::warn!(error = %err, "token revocation failed, clearing session anyway");
            }
        }
    }
    let jar = auth.clear();
    (jar, found("/")).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ErrorParams {
    pub title: Option<String>,
    pub message: Option<String>,
}

/// `GET /error`: pure rendering of the title/message query parameters.
pub async fn error_page(Query(params): Query<ErrorParams>) -> Html<String> {
    Html(views::error_page(
        params.title.as_deref().unwrap_or(""),
        params.message.as_deref().unwrap_or(""),
    ))
}

/// `GET /terms`: the terms view without the login chrome.
pub async fn terms() -> Html<String> {
    Html(views::terms_page())
}

/// `GET /describe/{obj}`: field-name → field-type map of one object.
pub async fn describe(
    State(state): State<AppState>,
    auth: SessionAuthenticator,
    OriginalUri(uri): OriginalUri,
    Path(obj): Path<String>,
) -> Response {
    let session = match require_authenticated(&auth, &uri) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };

    match state.crm.describe_object(&access(&session), &obj).await {
        Ok(typemap) => Html(views::describe(&obj, &typemap)).into_response(),
        Err(fault) => crm_fault(&fault),
    }
}

/// Catch-all: list every object in the org.
pub async fn list_objects(
    State(state): State<AppState>,
    auth: SessionAuthenticator,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let session = match require_authenticated(&auth, &uri) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };

    match state.crm.list_objects(&access(&session)).await {
        Ok(objects) => Html(views::list(&objects)).into_response(),
        Err(fault) => crm_fault(&fault),
    }
}

/// Authentication guard for data routes.
///
/// Without a session, short-circuits into a redirect to `/authenticate`
/// carrying the full original path and query as `state`, so login resumes
/// exactly where the request started.
fn require_authenticated(
    auth: &SessionAuthenticator,
    uri: &Uri,
) -> Result<TokenSession, Response> {
    if let Some(session) = auth.session() {
        return Ok(session);
    }

    let original = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("state", original);
    Err(found(&format!("/authenticate?{}", query.finish())))
}

fn access(session: &TokenSession) -> CrmAccess {
    CrmAccess {
        access_token: session.access_token.clone(),
        instance_url: session.instance_url.clone(),
    }
}

/// Uniform fault channel for CRM fetches: log the fault with its kind and
/// cause chain, then redirect into the error view. The browser sees a 302
/// and re-requests `/error`; request-level faults never surface as 5xx.
fn crm_fault(fault: &CrmError) -> Response {
    tracing::error!(
        kind = fault.kind(),
        message = %fault,
        caused_by = %cause_chain(fault),
        "CRM fetch failed"
    );

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("title", "An error occurred");
    query.append_pair("message", &fault.to_string());
    found(&format!("/error?{}", query.finish()))
}

fn cause_chain(fault: &CrmError) -> String {
    let mut chain = Vec::new();
    let mut source = std::error::Error::source(fault);
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain.join(" <- ")
}
