//! Dashboard capabilities using bitflags.
//!
//! Capabilities cover actions that are not plain navigation, such as
//! triggering an agent run. Each role maps to a capability set through a
//! [`CapabilityPolicy`].

use std::collections::HashMap;

use bitflags::bitflags;
use designos_common::Role;

bitflags! {
    /// Named dashboard actions represented as a 32-bit bitfield.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct Capabilities: u32 {
        // === Overview ===
        /// Open the dashboard overview
        const VIEW_DASHBOARD  = 1 << 0;

        // === Assets ===
        /// Browse component kits
        const VIEW_KITS       = 1 << 1;
        /// Create, edit and delete component kits
        const MANAGE_KITS     = 1 << 2;
        /// Browse uploaded files
        const VIEW_FILES      = 1 << 3;
        /// Upload files to object storage
        const UPLOAD_FILES    = 1 << 4;
        /// Create, edit and delete links
        const MANAGE_LINKS    = 1 << 5;

        // === Agents ===
        /// Read stored agent recommendations
        const VIEW_AGENTS     = 1 << 6;
        /// Trigger an agent run
        const RUN_AGENTS      = 1 << 7;
        /// Configure agents
        const MANAGE_AGENTS   = 1 << 8;

        // === Administration ===
        /// Assign roles to users
        const MANAGE_USERS    = 1 << 9;
        /// Change dashboard settings
        const MANAGE_SETTINGS = 1 << 10;
    }
}

impl Capabilities {
    // === Role presets ===

    pub const VIEWER_DEFAULT: Self = Self::VIEW_DASHBOARD;

    pub const PRODUCER_DEFAULT: Self = Self::VIEWER_DEFAULT
        .union(Self::VIEW_KITS)
        .union(Self::MANAGE_KITS)
        .union(Self::VIEW_FILES)
        .union(Self::UPLOAD_FILES)
        .union(Self::MANAGE_LINKS);

    pub const CORE_DEFAULT: Self = Self::PRODUCER_DEFAULT
        .union(Self::VIEW_AGENTS)
        .union(Self::RUN_AGENTS);

    pub const ADMIN_DEFAULT: Self = Self::CORE_DEFAULT
        .union(Self::MANAGE_AGENTS)
        .union(Self::MANAGE_USERS)
        .union(Self::MANAGE_SETTINGS);

    /// Default capability set for a role.
    #[must_use]
    pub const fn preset(role: Role) -> Self {
        match role {
            Role::Viewer => Self::VIEWER_DEFAULT,
            Role::Producer => Self::PRODUCER_DEFAULT,
            Role::Core => Self::CORE_DEFAULT,
            Role::Admin => Self::ADMIN_DEFAULT,
        }
    }

    /// Look up a single capability by its snake_case action name.
    #[must_use]
    pub fn from_action_name(name: &str) -> Option<Self> {
        Self::from_name(&name.trim().to_ascii_uppercase())
    }

    /// Human-readable description of a single capability.
    ///
    /// Returns `None` for the empty set or a combination of flags.
    #[must_use]
    pub fn description(self) -> Option<&'static str> {
        DESCRIPTIONS
            .iter()
            .find(|(capability, _)| *capability == self)
            .map(|(_, text)| *text)
    }

    /// Snake_case action names of every capability in the set.
    #[must_use]
    pub fn action_names(&self) -> Vec<String> {
        self.iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect()
    }
}

const DESCRIPTIONS: &[(Capabilities, &str)] = &[
    (Capabilities::VIEW_DASHBOARD, "Open the dashboard overview"),
    (Capabilities::VIEW_KITS, "Browse component kits"),
    (Capabilities::MANAGE_KITS, "Create, edit and delete component kits"),
    (Capabilities::VIEW_FILES, "Browse uploaded files"),
    (Capabilities::UPLOAD_FILES, "Upload files"),
    (Capabilities::MANAGE_LINKS, "Create, edit and delete links"),
    (Capabilities::VIEW_AGENTS, "Read agent recommendations"),
    (Capabilities::RUN_AGENTS, "Trigger an agent run"),
    (Capabilities::MANAGE_AGENTS, "Configure agents"),
    (Capabilities::MANAGE_USERS, "Assign roles to users"),
    (Capabilities::MANAGE_SETTINGS, "Change dashboard settings"),
];

/// Mapping from role to granted capabilities.
#[derive(Debug, Clone)]
pub struct CapabilityPolicy {
    grants: HashMap<Role, Capabilities>,
}

impl CapabilityPolicy {
    /// Extend a role's grants. Applied at construction; the policy is
    /// read-only once handed to the resolver.
    #[must_use]
    pub fn with_grant(mut self, role: Role, capabilities: Capabilities) -> Self {
        *self.grants.entry(role).or_insert_with(Capabilities::empty) |= capabilities;
        self
    }

    /// Capabilities granted to `role`.
    #[must_use]
    pub fn capabilities_for(&self, role: Role) -> Capabilities {
        self.grants.get(&role).copied().unwrap_or_else(Capabilities::empty)
    }

    /// `true` iff `role` holds every capability in `capability`.
    ///
    /// An empty query is never authorized.
    #[must_use]
    pub fn allows(&self, role: Role, capability: Capabilities) -> bool {
        !capability.is_empty() && self.capabilities_for(role).contains(capability)
    }
}

impl Default for CapabilityPolicy {
    fn default() -> Self {
        Self {
            grants: Role::all()
                .iter()
                .map(|role| (*role, Capabilities::preset(*role)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_capability_is_described() {
        for (name, capability) in Capabilities::all().iter_names() {
            assert!(capability.description().is_some(), "{name} has no description");
        }
        assert_eq!(Capabilities::empty().description(), None);
        assert_eq!(
            (Capabilities::VIEW_KITS | Capabilities::MANAGE_KITS).description(),
            None
        );
    }

    #[test]
    fn test_presets_are_nested() {
        assert!(Capabilities::PRODUCER_DEFAULT.contains(Capabilities::VIEWER_DEFAULT));
        assert!(Capabilities::CORE_DEFAULT.contains(Capabilities::PRODUCER_DEFAULT));
        assert!(Capabilities::ADMIN_DEFAULT.contains(Capabilities::CORE_DEFAULT));
        assert_eq!(Capabilities::ADMIN_DEFAULT, Capabilities::all());
    }

    #[test]
    fn test_only_core_and_above_run_agents() {
        let policy = CapabilityPolicy::default();
        assert!(!policy.allows(Role::Viewer, Capabilities::RUN_AGENTS));
        assert!(!policy.allows(Role::Producer, Capabilities::RUN_AGENTS));
        assert!(policy.allows(Role::Core, Capabilities::RUN_AGENTS));
        assert!(policy.allows(Role::Admin, Capabilities::RUN_AGENTS));
    }

    #[test]
    fn test_combined_query_requires_all_bits() {
        let policy = CapabilityPolicy::default();
        let query = Capabilities::UPLOAD_FILES | Capabilities::MANAGE_USERS;
        assert!(!policy.allows(Role::Producer, query));
        assert!(policy.allows(Role::Admin, query));
    }

    #[test]
    fn test_empty_query_is_denied() {
        let policy = CapabilityPolicy::default();
        assert!(!policy.allows(Role::Admin, Capabilities::empty()));
    }

    #[test]
    fn test_with_grant_extends_role() {
        let policy =
            CapabilityPolicy::default().with_grant(Role::Producer, Capabilities::RUN_AGENTS);
        assert!(policy.allows(Role::Producer, Capabilities::RUN_AGENTS));
        assert!(policy.allows(Role::Producer, Capabilities::UPLOAD_FILES));
        assert!(!policy.allows(Role::Viewer, Capabilities::RUN_AGENTS));
    }

    #[test]
    fn test_action_names_are_snake_case_and_parse_back() {
        for name in Capabilities::all().action_names() {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "Action name '{name}' should be snake_case"
            );
            let parsed = Capabilities::from_action_name(&name).unwrap();
            assert_eq!(parsed.action_names(), vec![name]);
        }
    }

    #[test]
    fn test_from_action_name_unknown() {
        assert!(Capabilities::from_action_name("launch_rockets").is_none());
    }

    #[test]
    fn test_viewer_action_names() {
        assert_eq!(
            Capabilities::VIEWER_DEFAULT.action_names(),
            vec!["view_dashboard".to_string()]
        );
    }
}
