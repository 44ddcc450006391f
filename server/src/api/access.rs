//! Session and Access API
//!
//! JSON views of the gate for the dashboard client. The client may cache
//! these as hints, but page requests are always re-checked server-side.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::AppState,
    auth::{redirect_location, whole_secs, AuthError, SessionPrincipal},
    session::{GateDecision, SessionState},
};

/// Resolved session response.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// `authorized` or `no_access`.
    pub state: &'static str,
    /// Role identifier from the session token.
    pub role: String,
    /// Display label, when the role is recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_label: Option<&'static str>,
    /// First visible tab, when authorized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_route: Option<String>,
    /// Seconds until the client must log out, when no tab is visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout_after_secs: Option<u64>,
}

/// Resolve the session's role.
///
/// GET /api/session
#[tracing::instrument(skip_all, fields(user_id = %principal.user_id))]
pub async fn get_session(
    State(state): State<AppState>,
    principal: SessionPrincipal,
) -> Result<Json<SessionResponse>, AuthError> {
    let key = principal.session_key();
    let response = match state.sessions.resolve(key, &principal.role) {
        SessionState::Authorized {
            role,
            default_route,
        } => SessionResponse {
            state: "authorized",
            role: role.as_str().to_string(),
            role_label: Some(role.label()),
            default_route: Some(default_route),
            logout_after_secs: None,
        },
        SessionState::NoAccess { role } => SessionResponse {
            state: "no_access",
            role_label: None,
            logout_after_secs: Some(
                state
                    .sessions
                    .termination_pending(key.id)
                    .map_or(state.config.no_access_grace_secs, whole_secs),
            ),
            role,
            default_route: None,
        },
        _ => return Err(AuthError::SessionTerminated),
    };
    Ok(Json(response))
}

/// Access check query.
#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    pub path: String,
}

/// Access check response.
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    /// `true` for permitted routes and for the landing route `/`.
    pub allowed: bool,
    /// Where the route guard sends the browser instead; set for the landing
    /// route even though it is allowed.
    pub redirect: Option<String>,
}

/// Check a route without navigating to it.
///
/// GET /api/access?path=/kits/42
#[tracing::instrument(skip_all, fields(user_id = %principal.user_id, path = %query.path))]
pub async fn check_access(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Query(query): Query<AccessQuery>,
) -> Json<AccessResponse> {
    let decision = state
        .sessions
        .check(principal.session_key(), &principal.role, &query.path);
    let redirect = redirect_location(&state.config, &decision, &query.path);

    Json(AccessResponse {
        allowed: matches!(decision, GateDecision::Allow | GateDecision::Landing { .. }),
        redirect,
    })
}

/// One granted action.
#[derive(Debug, Serialize)]
pub struct CapabilityItem {
    /// Snake_case action name, e.g. `manage_kits`.
    pub action: String,
    pub description: &'static str,
}

/// Granted capabilities response.
#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub role: String,
    pub capabilities: Vec<CapabilityItem>,
}

/// List the actions the session's role may perform.
///
/// GET /api/capabilities
#[tracing::instrument(skip_all, fields(user_id = %principal.user_id))]
pub async fn get_capabilities(
    State(state): State<AppState>,
    principal: SessionPrincipal,
) -> Json<CapabilitiesResponse> {
    let capabilities = state
        .resolver
        .capabilities(&principal.role)
        .iter_names()
        .map(|(name, capability)| CapabilityItem {
            action: name.to_ascii_lowercase(),
            description: capability.description().unwrap_or_default(),
        })
        .collect();
    Json(CapabilitiesResponse {
        role: principal.role,
        capabilities,
    })
}
