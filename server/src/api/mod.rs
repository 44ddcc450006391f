//! API Router and Application State
//!
//! Central routing configuration and shared state.

mod access;
mod navigation;
mod pages;

use axum::{
    extract::State, middleware::from_fn_with_state, routing::get, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth, config::Config, permissions::PermissionResolver, session::SessionStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Read-only role and tab configuration
    pub resolver: Arc<PermissionResolver>,
    /// Live sessions and their no-access grace timers
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, resolver: PermissionResolver) -> Self {
        let resolver = Arc::new(resolver);
        let sessions = SessionStore::new(Arc::clone(&resolver), config.no_access_grace());
        Self {
            config: Arc::new(config),
            resolver,
            sessions: Arc::new(sessions),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // JSON endpoints answer 401 themselves; no redirects
    let api_routes = Router::new()
        .route("/api/navigation", get(navigation::get_navigation))
        .route("/api/session", get(access::get_session))
        .route("/api/access", get(access::check_access))
        .route("/api/capabilities", get(access::get_capabilities));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Login, forbidden and no-access pages
        .merge(pages::public_router())
        .nest("/auth", auth::router())
        .merge(api_routes)
        // Tab pages behind the route guard
        .merge(pages::guarded_router(&state))
        // Middleware
        .layer(from_fn_with_state(state.clone(), auth::authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Number of tabs in the catalog
    tabs: usize,
    /// Number of tracked sessions
    sessions: usize,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        tabs: state.resolver.registry().len(),
        sessions: state.sessions.len(),
    })
}
