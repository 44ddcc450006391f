//! Authentication Handlers

use axum::{extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use super::middleware::SessionPrincipal;
use crate::api::AppState;

/// End the session and clear the session cookie.
///
/// A verified token is terminated server-side, so a copy of it kept
/// elsewhere is sent to login too. Token revocation at the identity
/// provider is out of scope.
#[tracing::instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    principal: Option<SessionPrincipal>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    if let Some(principal) = principal {
        state.sessions.logout(principal.session_key());
    }

    let removal = Cookie::build(state.config.session_cookie.clone())
        .path("/")
        .build();
    (jar.remove(removal), StatusCode::NO_CONTENT)
}
