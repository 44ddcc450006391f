//! Shared error types.

use thiserror::Error;

/// A role identifier outside the closed role set.
///
/// Upstream identity providers validate roles before they reach the
/// dashboard, so this error points at a configuration mismatch between
/// the provider and the role hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {role:?}")]
pub struct UnknownRoleError {
    /// The offending role string, as received.
    pub role: String,
}

impl UnknownRoleError {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}
