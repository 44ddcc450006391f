//! Authentication and Route Gating Middleware

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use url::form_urlencoded;
use uuid::Uuid;

use super::error::AuthError;
use super::jwt::validate_session_token;
use crate::api::AppState;
use crate::config::Config;
use crate::session::{evaluate, AuthOutcome, GateDecision, SessionKey};

/// Verified session identity injected into request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPrincipal {
    /// User ID from the token subject.
    pub user_id: Uuid,
    /// Token ID, one per login.
    pub session_id: Uuid,
    /// Token expiry (Unix timestamp).
    pub expires_at: i64,
    /// Role identifier from the verified token.
    pub role: String,
}

impl SessionPrincipal {
    /// Key of this session in the [`crate::session::SessionStore`].
    #[must_use]
    pub const fn session_key(&self) -> SessionKey {
        SessionKey {
            id: self.session_id,
            expires_at: self.expires_at,
        }
    }
}

/// Read the session token from `Authorization: Bearer` or the session cookie.
///
/// The header wins when both are present.
fn extract_token(
    headers: &HeaderMap,
    jar: &CookieJar,
    cookie_name: &str,
) -> Result<Option<String>, AuthError> {
    if let Some(header) = headers.get(AUTHORIZATION) {
        let token = header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthError::InvalidAuthHeader)?;
        return Ok(Some(token.trim().to_string()));
    }

    Ok(jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty()))
}

/// Verify the session token, if any, and record the outcome.
///
/// Never rejects: every request gets an [`AuthOutcome`] in its extensions,
/// plus a [`SessionPrincipal`] when the token verified and its session is
/// still live. Route guards and extractors decide what to do with anonymous,
/// rejected or terminated requests.
#[tracing::instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = match extract_token(request.headers(), &jar, &state.config.session_cookie) {
        Ok(None) => AuthOutcome::Anonymous,
        Ok(Some(token)) => match verify(&token, &state.config.jwt_public_key) {
            Ok(principal) if state.sessions.is_terminated(principal.session_id) => {
                tracing::debug!(session_id = %principal.session_id, "Session already terminated");
                AuthOutcome::Terminated
            }
            Ok(principal) => {
                let outcome = AuthOutcome::Verified {
                    role: principal.role.clone(),
                };
                request.extensions_mut().insert(principal);
                outcome
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
                AuthOutcome::Rejected {
                    expired: matches!(e, AuthError::TokenExpired),
                }
            }
        },
        Err(e) => {
            tracing::debug!(error = %e, "Malformed authorization header");
            AuthOutcome::Rejected { expired: false }
        }
    };

    request.extensions_mut().insert(outcome);
    next.run(request).await
}

fn verify(token: &str, public_key: &str) -> Result<SessionPrincipal, AuthError> {
    let claims = validate_session_token(token, public_key)?;
    Ok(SessionPrincipal {
        user_id: claims.user_id()?,
        session_id: claims.session_id()?,
        expires_at: claims.exp,
        role: claims.role,
    })
}

/// Gate page routes on the session's role.
///
/// Must run after [`authenticate`]. Allowed requests pass through; every
/// other decision becomes a `303 See Other` to the login, forbidden or
/// no-access page.
#[tracing::instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let decision = match request.extensions().get::<SessionPrincipal>() {
        Some(principal) => {
            state
                .sessions
                .check(principal.session_key(), &principal.role, &path)
        }
        None => {
            let outcome = request
                .extensions()
                .get::<AuthOutcome>()
                .cloned()
                .unwrap_or(AuthOutcome::Anonymous);
            evaluate(
                &state.resolver,
                &outcome,
                &path,
                state.config.no_access_grace(),
            )
        }
    };

    match &decision {
        GateDecision::Forbidden { role, .. } => {
            tracing::info!(role = %role, "Route not permitted for role");
        }
        GateDecision::NoAccess { role, .. } => {
            tracing::warn!(role = %role, "Role grants no dashboard access");
        }
        _ => {}
    }

    match redirect_location(&state.config, &decision, &path) {
        None => next.run(request).await,
        Some(location) => Redirect::to(&location).into_response(),
    }
}

/// Where a gate decision sends the browser, or `None` to serve `path`.
pub(crate) fn redirect_location(
    config: &Config,
    decision: &GateDecision,
    path: &str,
) -> Option<String> {
    match decision {
        GateDecision::Allow => None,
        GateDecision::Landing { to } => Some(to.clone()),
        GateDecision::RedirectToLogin | GateDecision::Pending => {
            Some(with_query(&config.login_path, &[("next", path)]))
        }
        GateDecision::Forbidden { role, fallback } => Some(with_query(
            &config.forbidden_path,
            &[("role", role.as_str()), ("fallback", fallback.as_str())],
        )),
        GateDecision::NoAccess { role, logout_after } => Some(with_query(
            &config.no_access_path,
            &[
                ("role", role.as_str()),
                ("logout_after", whole_secs(*logout_after).to_string().as_str()),
            ],
        )),
    }
}

/// Seconds in `duration`, rounded up so a pending logout never reads as 0
/// early.
pub(crate) fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{path}?{query}")
}

/// Extractor for the verified principal in handlers.
///
/// Rejects with 401, distinguishing a missing token from a rejected one.
impl<S> axum::extract::FromRequestParts<S> for SessionPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Self>() {
            return Ok(principal.clone());
        }

        match parts.extensions.get::<AuthOutcome>() {
            Some(AuthOutcome::Rejected { expired: true }) => Err(AuthError::TokenExpired),
            Some(AuthOutcome::Rejected { expired: false }) => Err(AuthError::InvalidToken),
            Some(AuthOutcome::Terminated) => Err(AuthError::SessionTerminated),
            _ => Err(AuthError::MissingToken),
        }
    }
}

/// Optional principal for handlers that also serve anonymous requests.
impl<S> axum::extract::OptionalFromRequestParts<S> for SessionPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned())
    }
}
