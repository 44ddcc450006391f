//! Page Routes
//!
//! Tab pages sit behind [`route_guard`]; the login, forbidden and no-access
//! pages are public so redirects to them always resolve. Each page returns
//! the context the dashboard shell renders.

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{navigation::NavigationItem, AppState},
    auth::{route_guard, SessionPrincipal},
    permissions::route_matches,
};

/// Router for every tab in the catalog plus the landing route.
///
/// Unknown paths fall through to the guard as well, so an authenticated
/// user gets the forbidden page rather than a bare 404.
pub fn guarded_router(state: &AppState) -> Router<AppState> {
    let mut router = Router::new();
    let mut has_root = false;

    for tab in state.resolver.registry().list_all() {
        if tab.path == "/" {
            has_root = true;
            router = router.route("/", get(tab_page));
        } else {
            router = router
                .route(&tab.path, get(tab_page))
                .route(&format!("{}/{{*rest}}", tab.path), get(tab_page));
        }
    }

    // The guard turns `/` into a redirect to the default route
    if !has_root {
        router = router.route("/", get(tab_page));
    }

    router
        .fallback(tab_page)
        .layer(from_fn_with_state(state.clone(), route_guard))
}

/// Public page routes.
///
/// - GET /login
/// - GET /forbidden
/// - GET /no-access
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page))
        .route("/forbidden", get(forbidden_page))
        .route("/no-access", get(no_access_page))
}

/// Context for a tab page.
#[derive(Debug, Serialize)]
pub struct TabPage {
    pub tab: NavigationItem,
    /// Requested path within the tab.
    pub path: String,
    pub role: String,
}

/// Render a tab page. Only reached once the guard allowed the route.
#[tracing::instrument(skip_all, fields(path = %uri.path()))]
async fn tab_page(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    uri: Uri,
) -> Result<Json<TabPage>, StatusCode> {
    let tab = state
        .resolver
        .allowed_tabs(&principal.role)
        .into_iter()
        .find(|tab| route_matches(&tab.path, uri.path()))
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(TabPage {
        tab: NavigationItem::from(tab),
        path: uri.path().to_string(),
        role: principal.role,
    }))
}

#[derive(Debug, Deserialize)]
struct LoginQuery {
    next: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginPage {
    page: &'static str,
    /// Route to return to after login.
    next: Option<String>,
}

async fn login_page(Query(query): Query<LoginQuery>) -> Json<LoginPage> {
    Json(LoginPage {
        page: "login",
        next: query.next.filter(|next| next.starts_with('/')),
    })
}

#[derive(Debug, Deserialize)]
struct ForbiddenQuery {
    role: Option<String>,
    fallback: Option<String>,
}

#[derive(Debug, Serialize)]
struct ForbiddenPage {
    page: &'static str,
    role: Option<String>,
    /// Way back to a permitted route.
    fallback: Option<String>,
}

async fn forbidden_page(Query(query): Query<ForbiddenQuery>) -> Json<ForbiddenPage> {
    Json(ForbiddenPage {
        page: "forbidden",
        role: query.role,
        fallback: query.fallback.filter(|fallback| fallback.starts_with('/')),
    })
}

#[derive(Debug, Deserialize)]
struct NoAccessQuery {
    role: Option<String>,
}

#[derive(Debug, Serialize)]
struct NoAccessPage {
    page: &'static str,
    role: Option<String>,
    /// The client calls `logout_path` once this many seconds have passed.
    logout_after_secs: u64,
    logout_path: &'static str,
}

/// The grace period comes from configuration, not the query string.
async fn no_access_page(
    State(state): State<AppState>,
    Query(query): Query<NoAccessQuery>,
) -> Json<NoAccessPage> {
    Json(NoAccessPage {
        page: "no_access",
        role: query.role,
        logout_after_secs: state.config.no_access_grace_secs,
        logout_path: "/auth/logout",
    })
}
