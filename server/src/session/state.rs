//! Session states and gate decisions.

use std::time::Duration;

use designos_common::Role;
use serde::Serialize;

/// Lifecycle of one user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No valid session token.
    Unauthenticated,
    /// Token present, role not resolved yet. Nothing protected renders here.
    Authenticating,
    /// Role resolved with at least one visible tab.
    Authorized {
        role: Role,
        /// Path of the first visible tab.
        default_route: String,
    },
    /// Role resolved but it grants no tabs. Terminated after the grace period.
    NoAccess {
        /// Role identifier as received; may be outside the closed set.
        role: String,
    },
    /// Session invalidated. The next request starts over unauthenticated.
    Terminated,
}

impl SessionState {
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized { .. })
    }

    #[must_use]
    pub const fn is_no_access(&self) -> bool {
        matches!(self, Self::NoAccess { .. })
    }
}

/// What request handling should do with a requested route.
///
/// The gate never performs the redirect itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Serve the route.
    Allow,
    /// Landing on `/`: send the user to their default route.
    Landing { to: String },
    /// No valid session; go to the login entry point.
    RedirectToLogin,
    /// Authenticated but the route is not permitted.
    Forbidden {
        /// Role label for the forbidden page.
        role: String,
        /// First visible tab, offered as the way back.
        fallback: String,
    },
    /// The role grants nothing; show the no-access page and log out after
    /// `logout_after`.
    NoAccess { role: String, logout_after: Duration },
    /// Role resolution has not finished.
    Pending,
}
