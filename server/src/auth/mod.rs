//! Authentication
//!
//! Verifies session tokens issued by the identity provider and records the
//! verified role for the session gate.

mod error;
mod handlers;
pub mod jwt;
mod middleware;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use error::{AuthError, AuthResult, ErrorResponse};
pub(crate) use middleware::{redirect_location, whole_secs};
pub use middleware::{authenticate, route_guard, SessionPrincipal};

/// Create authentication router.
///
/// - POST /logout - Clear the session cookie
pub fn router() -> Router<AppState> {
    Router::new().route("/logout", post(handlers::logout))
}
