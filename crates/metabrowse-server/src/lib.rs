//! metabrowse server library
//!
//! Route handlers and view rendering for the metadata browser. The router
//! is exposed as a library function so integration tests can drive it with
//! an injected mock CRM client; the binary handles startup.

pub mod config;
pub mod htmlize;
pub mod routes;
pub mod state;
pub mod views;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Create the main router with all routes configured.
///
/// Unmatched GET paths fall through to the object list; there is no
/// explicit 404. Other methods on unmatched paths get 405. The login flow
/// is nested under the configured path prefix.
pub fn create_router(state: AppState) -> Router {
    let path_prefix = state.settings.path_prefix.clone();

    Router::new()
        .route("/authenticate", get(routes::authenticate))
        .route("/unauthenticate", get(routes::unauthenticate))
        .route("/error", get(routes::error_page))
        .route("/terms", get(routes::terms))
        .route("/describe/:obj", get(routes::describe))
        .nest(&path_prefix, metabrowse_oauth::flow::router())
        .fallback(get(routes::list_objects))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
