//! OAuth2 web-server-flow session middleware for metabrowse
//!
//! Owns everything between the browser and the token: the named endpoint
//! set (production and sandbox hosts, each with its own credential pair),
//! the login-initiation and callback routes, the encrypted cookie session
//! holding the issued token, and the redirect-state sanitizer.
//!
//! The flow router is nestable under any configured path prefix:
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .nest("/auth/salesforce", metabrowse_oauth::flow::router())
//!     .with_state(state);
//! ```
//!
//! Handlers observe the session only through [`SessionAuthenticator`], an
//! extractor exposing `is_authenticated` / `session` / `store` / `clear` —
//! token contents never leak into application code beyond the access data
//! handed to the CRM client.

pub mod endpoints;
pub mod flow;
pub mod redirect;
pub mod session;
pub mod settings;

pub use endpoints::{Credentials, EndpointSet, PRODUCTION_HOST, SANDBOX_HOST};
pub use redirect::{found, sanitize_state};
pub use session::{SessionAuthenticator, TokenSession, SESSION_COOKIE};
pub use settings::{LogoutBehavior, OAuthSettings, OverrideFlags};
