//! Tab registry.
//!
//! Static, ordered catalog of the dashboard's top-level sections. The
//! catalog is validated once at construction and never mutated afterwards;
//! display order is insertion order.

use std::collections::HashSet;

use designos_common::{IconName, Role, RoleSet};
use serde::Serialize;
use thiserror::Error;

use super::hierarchy::RoleHierarchy;
use super::icons::{icon_ref, IconRef};

/// Invalid tab catalog. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two tabs share an identifier.
    #[error("Duplicate tab id: {0}")]
    DuplicateTab(String),

    /// Two tabs share a navigation path.
    #[error("Tab {id} reuses path {path}")]
    DuplicatePath { id: String, path: String },

    /// The path is empty, relative, or has a trailing slash.
    #[error("Tab {id} has invalid path {path:?}")]
    InvalidPath { id: String, path: String },
}

/// One navigable section of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabDefinition {
    /// Unique identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Route prefix, e.g. `/kits`.
    pub path: String,
    /// Symbolic icon.
    pub icon: IconName,
    /// Roles allowed to see the tab.
    #[serde(skip)]
    pub roles: RoleSet,
}

impl TabDefinition {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        path: impl Into<String>,
        icon: IconName,
        roles: RoleSet,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            path: path.into(),
            icon,
            roles,
        }
    }

    /// Check whether `role` may see this tab.
    #[must_use]
    pub const fn is_visible_to(&self, role: Role) -> bool {
        self.roles.contains_role(role)
    }

    /// Renderable icon for this tab.
    #[must_use]
    pub const fn icon_ref(&self) -> IconRef {
        icon_ref(self.icon)
    }
}

/// Read-only, validated tab catalog.
#[derive(Debug, Clone)]
pub struct TabRegistry {
    tabs: Vec<TabDefinition>,
}

impl TabRegistry {
    /// Validate and freeze a catalog.
    pub fn new(tabs: Vec<TabDefinition>) -> Result<Self, RegistryError> {
        let mut ids = HashSet::with_capacity(tabs.len());
        let mut paths = HashSet::with_capacity(tabs.len());

        for tab in &tabs {
            if !is_valid_path(&tab.path) {
                return Err(RegistryError::InvalidPath {
                    id: tab.id.clone(),
                    path: tab.path.clone(),
                });
            }
            if !ids.insert(tab.id.as_str()) {
                return Err(RegistryError::DuplicateTab(tab.id.clone()));
            }
            if !paths.insert(tab.path.as_str()) {
                return Err(RegistryError::DuplicatePath {
                    id: tab.id.clone(),
                    path: tab.path.clone(),
                });
            }
        }

        Ok(Self { tabs })
    }

    /// The `DesignOS` dashboard catalog.
    pub fn designos(hierarchy: &RoleHierarchy) -> Result<Self, RegistryError> {
        let producer_plus = hierarchy.roles_at_least(Role::Producer);
        let core_plus = hierarchy.roles_at_least(Role::Core);
        let admin_only = hierarchy.roles_at_least(Role::Admin);

        Self::new(vec![
            TabDefinition::new(
                "dashboard",
                "Dashboard",
                "/dashboard",
                IconName::LayoutDashboard,
                RoleSet::all(),
            ),
            TabDefinition::new("kits", "Kits", "/kits", IconName::Package, producer_plus),
            TabDefinition::new("files", "Files", "/files", IconName::FileText, producer_plus),
            TabDefinition::new("links", "Links", "/links", IconName::Link, producer_plus),
            TabDefinition::new("agents", "Agents", "/agents", IconName::Bot, core_plus),
            TabDefinition::new("users", "Users", "/users", IconName::Users, admin_only),
            TabDefinition::new(
                "settings",
                "Settings",
                "/settings",
                IconName::Settings,
                admin_only,
            ),
        ])
    }

    /// Full catalog in display order.
    #[must_use]
    pub fn list_all(&self) -> &[TabDefinition] {
        &self.tabs
    }

    /// Look up a tab by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TabDefinition> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

/// Absolute, non-empty, no trailing slash (except the root itself).
fn is_valid_path(path: &str) -> bool {
    path.starts_with('/') && (path == "/" || !path.ends_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: &str, path: &str) -> TabDefinition {
        TabDefinition::new(id, id, path, IconName::Circle, RoleSet::all())
    }

    #[test]
    fn test_designos_catalog_order() {
        let registry = TabRegistry::designos(&RoleHierarchy::default()).unwrap();
        let ids: Vec<&str> = registry.list_all().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["dashboard", "kits", "files", "links", "agents", "users", "settings"]
        );
    }

    #[test]
    fn test_list_all_is_deterministic() {
        let registry = TabRegistry::designos(&RoleHierarchy::default()).unwrap();
        assert_eq!(registry.list_all(), registry.list_all());
    }

    #[test]
    fn test_designos_role_sets() {
        let registry = TabRegistry::designos(&RoleHierarchy::default()).unwrap();
        let kits = registry.get("kits").unwrap();
        assert!(!kits.is_visible_to(Role::Viewer));
        assert!(kits.is_visible_to(Role::Producer));
        assert!(kits.is_visible_to(Role::Admin));

        let agents = registry.get("agents").unwrap();
        assert!(!agents.is_visible_to(Role::Producer));
        assert!(agents.is_visible_to(Role::Core));

        let users = registry.get("users").unwrap();
        assert_eq!(users.roles, RoleSet::ADMIN);
    }

    #[test]
    fn test_duplicate_id_fails() {
        let result = TabRegistry::new(vec![tab("kit", "/kit"), tab("kit", "/kit2")]);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateTab("kit".to_string())
        );
    }

    #[test]
    fn test_duplicate_path_fails() {
        let result = TabRegistry::new(vec![tab("kit", "/kit"), tab("kits", "/kit")]);
        assert!(matches!(
            result.unwrap_err(),
            RegistryError::DuplicatePath { .. }
        ));
    }

    #[test]
    fn test_invalid_paths_fail() {
        for path in ["", "kit", "/kit/"] {
            let result = TabRegistry::new(vec![tab("kit", path)]);
            assert!(
                matches!(result, Err(RegistryError::InvalidPath { .. })),
                "path {path:?} should be rejected"
            );
        }
        assert!(TabRegistry::new(vec![tab("home", "/")]).is_ok());
    }

    #[test]
    fn test_get_unknown_tab() {
        let registry = TabRegistry::new(vec![tab("kit", "/kit")]).unwrap();
        assert!(registry.get("agent").is_none());
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_tab_icon_ref() {
        let registry = TabRegistry::designos(&RoleHierarchy::default()).unwrap();
        let icon = registry.get("agents").unwrap().icon_ref();
        assert_eq!(icon.name, IconName::Bot);
    }
}
