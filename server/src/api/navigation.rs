//! Navigation API
//!
//! Tabs the session's role may see, in catalog order.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    api::AppState,
    auth::SessionPrincipal,
    permissions::{IconRef, TabDefinition},
};

/// One entry of the navigation bar.
#[derive(Debug, Serialize)]
pub struct NavigationItem {
    pub id: String,
    pub label: String,
    pub path: String,
    pub icon: IconRef,
}

impl From<&TabDefinition> for NavigationItem {
    fn from(tab: &TabDefinition) -> Self {
        Self {
            id: tab.id.clone(),
            label: tab.label.clone(),
            path: tab.path.clone(),
            icon: tab.icon_ref(),
        }
    }
}

/// List visible tabs.
///
/// An unrecognized role gets an empty list, not an error.
///
/// GET /api/navigation
#[tracing::instrument(skip_all, fields(user_id = %principal.user_id))]
pub async fn get_navigation(
    State(state): State<AppState>,
    principal: SessionPrincipal,
) -> Json<Vec<NavigationItem>> {
    let items = state
        .resolver
        .allowed_tabs(&principal.role)
        .into_iter()
        .map(NavigationItem::from)
        .collect();
    Json(items)
}
