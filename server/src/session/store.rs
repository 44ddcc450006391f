//! Live sessions of the HTTP server.
//!
//! One [`SessionGate`] per session token, keyed by the token ID. The gate's
//! grace timer ends a no-access session on the server; a terminated token
//! stays terminated until it expires, so only a fresh login gets back in.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use uuid::Uuid;

use super::gate::SessionGate;
use super::state::{GateDecision, SessionState};
use crate::permissions::PermissionResolver;

/// Identity of one session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionKey {
    /// Token ID.
    pub id: Uuid,
    /// Token expiry (Unix timestamp). The session is forgotten after it.
    pub expires_at: i64,
}

struct TrackedSession {
    gate: SessionGate,
    expires_at: i64,
}

pub struct SessionStore {
    resolver: Arc<PermissionResolver>,
    grace_period: Duration,
    sessions: DashMap<Uuid, TrackedSession>,
}

impl SessionStore {
    #[must_use]
    pub fn new(resolver: Arc<PermissionResolver>, grace_period: Duration) -> Self {
        Self {
            resolver,
            grace_period,
            sessions: DashMap::new(),
        }
    }

    /// Resolve the session's role, creating its gate on first sight.
    ///
    /// Returns `Terminated` once the grace period or a logout ended the
    /// session; the role is not looked at again after that.
    pub fn resolve(&self, key: SessionKey, role: &str) -> SessionState {
        self.tracked(key).gate.resolve(role)
    }

    /// Decide a request for `path`.
    pub fn check(&self, key: SessionKey, role: &str, path: &str) -> GateDecision {
        let mut session = self.tracked(key);
        if matches!(session.gate.resolve(role), SessionState::Terminated) {
            return GateDecision::RedirectToLogin;
        }
        session.gate.check(path)
    }

    /// Check whether the session was ended. Unknown sessions are live.
    #[must_use]
    pub fn is_terminated(&self, id: Uuid) -> bool {
        self.sessions
            .get(&id)
            .is_some_and(|session| matches!(session.gate.state(), SessionState::Terminated))
    }

    /// Time left before a no-access session is terminated.
    #[must_use]
    pub fn termination_pending(&self, id: Uuid) -> Option<Duration> {
        self.sessions
            .get(&id)
            .and_then(|session| session.gate.termination_pending())
    }

    /// End the session. Later requests with its token go to login.
    pub fn logout(&self, key: SessionKey) {
        self.tracked(key).gate.logout();
        tracing::debug!(session_id = %key.id, "Session logged out");
    }

    /// Number of tracked sessions, expired ones included until the next
    /// new session prunes them.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn tracked(&self, key: SessionKey) -> RefMut<'_, Uuid, TrackedSession> {
        if !self.sessions.contains_key(&key.id) {
            self.prune_expired();
        }

        self.sessions.entry(key.id).or_insert_with(|| {
            let mut gate = SessionGate::new(Arc::clone(&self.resolver), self.grace_period);
            gate.begin_authentication();
            TrackedSession {
                gate,
                expires_at: key.expires_at,
            }
        })
    }

    fn prune_expired(&self) {
        let now = Utc::now().timestamp();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);

        let pruned = before.saturating_sub(self.sessions.len());
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped expired sessions");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("grace_period", &self.grace_period)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}
