//! Role Types

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::UnknownRoleError;

/// Authorization level assigned to a dashboard user.
///
/// The set is closed. Roles come from the identity provider and do not
/// change for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access to the dashboard.
    Viewer,
    /// Maintains component kits, files and links.
    Producer,
    /// Core design team; may run agents.
    Core,
    /// Manages users and settings.
    Admin,
}

impl Role {
    /// Returns every role in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Viewer, Self::Producer, Self::Core, Self::Admin]
    }

    /// Wire identifier, as carried in session tokens.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Producer => "producer",
            Self::Core => "core",
            Self::Admin => "admin",
        }
    }

    /// Human-readable label for forbidden and no-access pages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Producer => "Producer",
            Self::Core => "Core",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    /// Parses the exact lowercase wire identifier. `"Admin"` and `" admin"`
    /// are unknown roles.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRoleError::new(s))
    }
}

bitflags! {
    /// Set of roles, used as the authorized-role set of a navigation tab.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct RoleSet: u8 {
        const VIEWER   = 1 << 0;
        const PRODUCER = 1 << 1;
        const CORE     = 1 << 2;
        const ADMIN    = 1 << 3;
    }
}

impl RoleSet {
    /// Singleton set for one role.
    #[must_use]
    pub const fn of(role: Role) -> Self {
        match role {
            Role::Viewer => Self::VIEWER,
            Role::Producer => Self::PRODUCER,
            Role::Core => Self::CORE,
            Role::Admin => Self::ADMIN,
        }
    }

    /// Check whether `role` is a member of this set.
    #[must_use]
    pub const fn contains_role(&self, role: Role) -> bool {
        self.contains(Self::of(role))
    }

    /// Build a set from any collection of roles.
    pub fn from_roles<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        roles
            .into_iter()
            .fold(Self::empty(), |set, role| set.union(Self::of(role)))
    }

    /// Members of the set, in [`Role::all`] order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        Role::all()
            .iter()
            .copied()
            .filter(move |role| self.contains_role(*role))
    }
}
