//! Role hierarchy.
//!
//! A strict total order over the closed role set. Rank 0 is the least
//! privileged role; every role has exactly one rank and no two roles share one.

use std::collections::HashMap;

use designos_common::{Role, RoleSet, UnknownRoleError};
use thiserror::Error;

/// Invalid hierarchy configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The same role was listed twice, which would give it two ranks.
    #[error("Role {0} appears more than once in the hierarchy")]
    Tie(Role),

    /// A role of the closed set has no rank.
    #[error("Role {0} is missing from the hierarchy")]
    Missing(Role),
}

/// Ranking over [`Role`], least privileged first.
#[derive(Debug, Clone)]
pub struct RoleHierarchy {
    order: Vec<Role>,
    ranks: HashMap<Role, u8>,
}

impl RoleHierarchy {
    /// Build a hierarchy from roles ordered least to most privileged.
    ///
    /// Every role of the closed set must appear exactly once.
    pub fn new(order: &[Role]) -> Result<Self, HierarchyError> {
        let mut ranks = HashMap::with_capacity(order.len());
        for (position, role) in order.iter().enumerate() {
            if ranks.insert(*role, position as u8).is_some() {
                return Err(HierarchyError::Tie(*role));
            }
        }

        if let Some(missing) = Role::all().iter().find(|role| !ranks.contains_key(role)) {
            return Err(HierarchyError::Missing(*missing));
        }

        Ok(Self {
            order: order.to_vec(),
            ranks,
        })
    }

    /// Rank a role identifier as received from the identity provider.
    ///
    /// Identifiers outside the closed set are a configuration defect and are
    /// logged before the error is returned.
    pub fn rank(&self, role: &str) -> Result<u8, UnknownRoleError> {
        let role = role.parse::<Role>().inspect_err(|e| {
            tracing::warn!(role = %e.role, "Role is not part of the configured hierarchy");
        })?;
        Ok(self.rank_of(role))
    }

    /// Rank of a parsed role.
    #[must_use]
    pub fn rank_of(&self, role: Role) -> u8 {
        self.ranks[&role]
    }

    /// `true` iff `role` is at least as privileged as `minimum`.
    #[must_use]
    pub fn is_at_least(&self, role: Role, minimum: Role) -> bool {
        self.rank_of(role) >= self.rank_of(minimum)
    }

    /// All roles at least as privileged as `minimum` ("producer+").
    #[must_use]
    pub fn roles_at_least(&self, minimum: Role) -> RoleSet {
        RoleSet::from_roles(
            self.order
                .iter()
                .copied()
                .filter(|role| self.is_at_least(*role, minimum)),
        )
    }

    /// Roles from least to most privileged.
    #[must_use]
    pub fn ordered(&self) -> &[Role] {
        &self.order
    }
}

impl Default for RoleHierarchy {
    /// `viewer < producer < core < admin`.
    fn default() -> Self {
        let order = Role::all().to_vec();
        let ranks = order
            .iter()
            .enumerate()
            .map(|(position, role)| (*role, position as u8))
            .collect();
        Self { order, ranks }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_order() {
        let hierarchy = RoleHierarchy::default();
        assert_eq!(hierarchy.rank_of(Role::Viewer), 0);
        assert_eq!(hierarchy.rank_of(Role::Producer), 1);
        assert_eq!(hierarchy.rank_of(Role::Core), 2);
        assert_eq!(hierarchy.rank_of(Role::Admin), 3);
    }

    #[test]
    fn test_rank_is_total_and_injective() {
        let hierarchy = RoleHierarchy::default();
        let ranks: HashSet<u8> = Role::all()
            .iter()
            .map(|role| hierarchy.rank(role.as_str()).unwrap())
            .collect();
        assert_eq!(ranks.len(), Role::all().len());
    }

    #[test]
    fn test_rank_unknown_role_fails() {
        let hierarchy = RoleHierarchy::default();
        let err = hierarchy.rank("guest").unwrap_err();
        assert_eq!(err.role, "guest");
    }

    #[test]
    fn test_is_at_least() {
        let hierarchy = RoleHierarchy::default();
        assert!(hierarchy.is_at_least(Role::Admin, Role::Producer));
        assert!(hierarchy.is_at_least(Role::Producer, Role::Producer));
        assert!(!hierarchy.is_at_least(Role::Viewer, Role::Producer));
        assert!(!hierarchy.is_at_least(Role::Core, Role::Admin));
    }

    #[test]
    fn test_roles_at_least() {
        let hierarchy = RoleHierarchy::default();
        assert_eq!(
            hierarchy.roles_at_least(Role::Core),
            RoleSet::CORE | RoleSet::ADMIN
        );
        assert_eq!(hierarchy.roles_at_least(Role::Viewer), RoleSet::all());
    }

    #[test]
    fn test_custom_order() {
        let hierarchy =
            RoleHierarchy::new(&[Role::Viewer, Role::Core, Role::Producer, Role::Admin]).unwrap();
        assert!(hierarchy.is_at_least(Role::Producer, Role::Core));
        assert_eq!(hierarchy.ordered()[1], Role::Core);
    }

    #[test]
    fn test_tie_is_rejected() {
        let result = RoleHierarchy::new(&[
            Role::Viewer,
            Role::Producer,
            Role::Producer,
            Role::Core,
            Role::Admin,
        ]);
        assert_eq!(result.unwrap_err(), HierarchyError::Tie(Role::Producer));
    }

    #[test]
    fn test_missing_role_is_rejected() {
        let result = RoleHierarchy::new(&[Role::Viewer, Role::Producer, Role::Admin]);
        assert_eq!(result.unwrap_err(), HierarchyError::Missing(Role::Core));
    }
}
