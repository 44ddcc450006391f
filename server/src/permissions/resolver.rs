//! Permission resolution logic.
//!
//! Computes what a role may see and do from the role hierarchy, the tab
//! registry and the capability policy. Everything here is pure: no I/O, no
//! locks, safe to call from any number of requests at once.

use std::sync::Arc;

use designos_common::Role;

use super::capability::{Capabilities, CapabilityPolicy};
use super::hierarchy::RoleHierarchy;
use super::registry::{RegistryError, TabDefinition, TabRegistry};

/// Role-to-permission resolver over immutable configuration.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    hierarchy: Arc<RoleHierarchy>,
    registry: Arc<TabRegistry>,
    policy: Arc<CapabilityPolicy>,
}

impl PermissionResolver {
    #[must_use]
    pub fn new(
        hierarchy: Arc<RoleHierarchy>,
        registry: Arc<TabRegistry>,
        policy: CapabilityPolicy,
    ) -> Self {
        Self {
            hierarchy,
            registry,
            policy: Arc::new(policy),
        }
    }

    /// Resolver over the default hierarchy, the `DesignOS` catalog and the
    /// default capability presets.
    pub fn designos() -> Result<Self, RegistryError> {
        let hierarchy = Arc::new(RoleHierarchy::default());
        let registry = Arc::new(TabRegistry::designos(&hierarchy)?);
        Ok(Self::new(hierarchy, registry, CapabilityPolicy::default()))
    }

    #[must_use]
    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    #[must_use]
    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    /// Tabs visible to a role identifier, in catalog order.
    ///
    /// An unrecognized role sees nothing.
    #[must_use]
    pub fn allowed_tabs(&self, role: &str) -> Vec<&TabDefinition> {
        parse_role(role).map_or_else(Vec::new, |role| self.allowed_tabs_for(role))
    }

    /// Tabs visible to a parsed role, in catalog order.
    #[must_use]
    pub fn allowed_tabs_for(&self, role: Role) -> Vec<&TabDefinition> {
        self.registry
            .list_all()
            .iter()
            .filter(|tab| tab.is_visible_to(role))
            .collect()
    }

    /// First visible tab in catalog order; `None` means no access at all.
    #[must_use]
    pub fn first_allowed_tab(&self, role: &str) -> Option<&TabDefinition> {
        let role = parse_role(role)?;
        self.registry
            .list_all()
            .iter()
            .find(|tab| tab.is_visible_to(role))
    }

    /// Check whether a direct navigation to `path` is permitted.
    ///
    /// A tab grants its own path and everything below it, matched on whole
    /// segments: `/kit` grants `/kit/42` but not `/kitchen`.
    #[must_use]
    pub fn can_access_route(&self, role: &str, path: &str) -> bool {
        self.allowed_tabs(role)
            .iter()
            .any(|tab| route_matches(&tab.path, path))
    }

    /// Check a non-navigation capability, e.g. [`Capabilities::RUN_AGENTS`].
    #[must_use]
    pub fn is_authorized(&self, role: &str, capability: Capabilities) -> bool {
        parse_role(role).is_some_and(|role| self.policy.allows(role, capability))
    }

    /// Every capability granted to a role identifier.
    #[must_use]
    pub fn capabilities(&self, role: &str) -> Capabilities {
        parse_role(role).map_or_else(Capabilities::empty, |role| {
            self.policy.capabilities_for(role)
        })
    }
}

fn parse_role(role: &str) -> Option<Role> {
    match role.parse::<Role>() {
        Ok(role) => Some(role),
        Err(e) => {
            tracing::warn!(role = %e.role, "Unrecognized role resolves to no permissions");
            None
        }
    }
}

/// Segment-wise prefix match of a request path against a tab path.
///
/// Query string and fragment are ignored. The root path `/` only matches
/// itself, otherwise it would grant every route. Paths with `.` or `..`
/// segments, plain or percent-encoded, match nothing.
#[must_use]
pub fn route_matches(tab_path: &str, path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();

    if has_dot_segment(path) {
        return false;
    }

    if tab_path == "/" {
        return path == "/";
    }

    let prefix = tab_path.trim_end_matches('/');
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        let decoded = segment.replace("%2e", ".").replace("%2E", ".");
        decoded == "." || decoded == ".."
    })
}
