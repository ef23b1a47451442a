//! Redirect-state sanitization and the 302 helper

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Normalize the "return-to" path carried through the login flow.
///
/// Blank or missing values become the root path; anything else passes
/// through unchanged. No allow-list or same-origin check is applied, so an
/// absolute URL in `state` is followed as-is.
pub fn sanitize_state(state: Option<&str>) -> String {
    match state {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => "/".to_string(),
    }
}

/// A 302 Found redirect.
///
/// Every redirect this application issues is a 302; axum's `Redirect`
/// constructors emit 303/307, so the response is built directly.
pub fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}
