//! Stateless per-request gating.
//!
//! Request middleware re-derives the role from the verified token on every
//! request, so each decision here starts from scratch. Role reassignments
//! show up on the next request without any push.

use std::time::Duration;

use designos_common::Role;

use super::state::{GateDecision, SessionState};
use crate::permissions::PermissionResolver;

/// Result of verifying the request's session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No token was presented.
    Anonymous,
    /// A token was presented but failed verification.
    Rejected { expired: bool },
    /// Verified token carrying this role identifier.
    Verified { role: String },
    /// Verified token whose session has already been terminated.
    Terminated,
}

/// Resolve a verified role into `Authorized` or `NoAccess`.
#[must_use]
pub fn resolve_state(resolver: &PermissionResolver, role: &str) -> SessionState {
    match (resolver.first_allowed_tab(role), role.parse::<Role>()) {
        (Some(tab), Ok(parsed)) => SessionState::Authorized {
            role: parsed,
            default_route: tab.path.clone(),
        },
        _ => SessionState::NoAccess {
            role: role.to_string(),
        },
    }
}

/// Decide a request for `path` given an already-resolved state.
#[must_use]
pub fn decide(
    resolver: &PermissionResolver,
    state: &SessionState,
    path: &str,
    logout_after: Duration,
) -> GateDecision {
    match state {
        SessionState::Unauthenticated | SessionState::Terminated => GateDecision::RedirectToLogin,
        SessionState::Authenticating => GateDecision::Pending,
        SessionState::Authorized {
            role,
            default_route,
        } => {
            if is_landing(path) && default_route != "/" {
                GateDecision::Landing {
                    to: default_route.clone(),
                }
            } else if resolver.can_access_route(role.as_str(), path) {
                GateDecision::Allow
            } else {
                GateDecision::Forbidden {
                    role: role.label().to_string(),
                    fallback: default_route.clone(),
                }
            }
        }
        SessionState::NoAccess { role } => GateDecision::NoAccess {
            role: role.clone(),
            logout_after,
        },
    }
}

/// Evaluate one request from its authentication outcome.
///
/// A rejected token never yields `NoAccess`: without a verified role there
/// is nothing to resolve, so the user is sent to log in again.
#[must_use]
pub fn evaluate(
    resolver: &PermissionResolver,
    outcome: &AuthOutcome,
    path: &str,
    grace_period: Duration,
) -> GateDecision {
    match outcome {
        AuthOutcome::Anonymous | AuthOutcome::Rejected { .. } | AuthOutcome::Terminated => {
            GateDecision::RedirectToLogin
        }
        AuthOutcome::Verified { role } => {
            let state = resolve_state(resolver, role);
            decide(resolver, &state, path, grace_period)
        }
    }
}

fn is_landing(path: &str) -> bool {
    path.split(['?', '#']).next().unwrap_or_default() == "/"
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRACE: Duration = Duration::from_secs(5);

    fn resolver() -> PermissionResolver {
        PermissionResolver::designos().unwrap()
    }

    fn verified(role: &str) -> AuthOutcome {
        AuthOutcome::Verified {
            role: role.to_string(),
        }
    }

    #[test]
    fn test_resolve_state_authorized_uses_first_tab() {
        let state = resolve_state(&resolver(), "viewer");
        assert_eq!(
            state,
            SessionState::Authorized {
                role: Role::Viewer,
                default_route: "/dashboard".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_state_unknown_role_is_no_access() {
        let state = resolve_state(&resolver(), "guest");
        assert_eq!(
            state,
            SessionState::NoAccess {
                role: "guest".to_string()
            }
        );
    }

    #[test]
    fn test_anonymous_redirects_to_login() {
        let decision = evaluate(&resolver(), &AuthOutcome::Anonymous, "/kits", GRACE);
        assert_eq!(decision, GateDecision::RedirectToLogin);
    }

    #[test]
    fn test_rejected_token_never_yields_no_access() {
        for expired in [true, false] {
            let decision = evaluate(
                &resolver(),
                &AuthOutcome::Rejected { expired },
                "/dashboard",
                GRACE,
            );
            assert_eq!(decision, GateDecision::RedirectToLogin);
        }
    }

    #[test]
    fn test_terminated_session_redirects_to_login() {
        let decision = evaluate(&resolver(), &AuthOutcome::Terminated, "/dashboard", GRACE);
        assert_eq!(decision, GateDecision::RedirectToLogin);
    }

    #[test]
    fn test_allowed_route() {
        let decision = evaluate(&resolver(), &verified("producer"), "/kits/42", GRACE);
        assert_eq!(decision, GateDecision::Allow);
    }

    #[test]
    fn test_forbidden_route_offers_fallback() {
        let decision = evaluate(&resolver(), &verified("viewer"), "/kits", GRACE);
        assert_eq!(
            decision,
            GateDecision::Forbidden {
                role: "Viewer".to_string(),
                fallback: "/dashboard".to_string(),
            }
        );
    }

    #[test]
    fn test_landing_goes_to_default_route() {
        let decision = evaluate(&resolver(), &verified("admin"), "/", GRACE);
        assert_eq!(
            decision,
            GateDecision::Landing {
                to: "/dashboard".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_role_is_no_access_with_grace() {
        let decision = evaluate(&resolver(), &verified("guest"), "/dashboard", GRACE);
        assert_eq!(
            decision,
            GateDecision::NoAccess {
                role: "guest".to_string(),
                logout_after: GRACE,
            }
        );
    }

    #[test]
    fn test_role_change_observed_on_next_evaluation() {
        let resolver = resolver();
        assert!(matches!(
            evaluate(&resolver, &verified("viewer"), "/settings", GRACE),
            GateDecision::Forbidden { .. }
        ));
        assert_eq!(
            evaluate(&resolver, &verified("admin"), "/settings", GRACE),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_root_tab_landing_is_served_not_redirected() {
        use std::sync::Arc;

        use designos_common::{IconName, RoleSet};

        use crate::permissions::{CapabilityPolicy, RoleHierarchy, TabDefinition, TabRegistry};

        let registry = TabRegistry::new(vec![
            TabDefinition::new("home", "Home", "/", IconName::LayoutDashboard, RoleSet::all()),
            TabDefinition::new("kits", "Kits", "/kits", IconName::Package, RoleSet::ADMIN),
        ])
        .unwrap();
        let resolver = PermissionResolver::new(
            Arc::new(RoleHierarchy::default()),
            Arc::new(registry),
            CapabilityPolicy::default(),
        );

        assert_eq!(
            evaluate(&resolver, &verified("viewer"), "/", GRACE),
            GateDecision::Allow
        );
        assert_eq!(
            evaluate(&resolver, &verified("viewer"), "/?tab=recent", GRACE),
            GateDecision::Allow
        );
        assert_eq!(
            evaluate(&resolver, &verified("viewer"), "/kits", GRACE),
            GateDecision::Forbidden {
                role: "Viewer".to_string(),
                fallback: "/".to_string(),
            }
        );
    }

    #[test]
    fn test_authenticating_is_pending() {
        let decision = decide(&resolver(), &SessionState::Authenticating, "/dashboard", GRACE);
        assert_eq!(decision, GateDecision::Pending);
    }
}
