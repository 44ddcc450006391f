//! Stateful gate for one session.
//!
//! Tracks the session through `Unauthenticated → Authenticating →
//! {Authorized, NoAccess} → Terminated` and owns the no-access grace timer.
//! A gate belongs to exactly one session; nothing in it is shared with other
//! sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::decision::{decide, resolve_state};
use super::state::{GateDecision, SessionState};
use crate::permissions::PermissionResolver;

/// Grace period before a `NoAccess` session is terminated.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

pub struct SessionGate {
    resolver: Arc<PermissionResolver>,
    grace_period: Duration,
    state: Arc<watch::Sender<SessionState>>,
    termination: Option<JoinHandle<()>>,
    termination_deadline: Option<Instant>,
}

impl SessionGate {
    #[must_use]
    pub fn new(resolver: Arc<PermissionResolver>, grace_period: Duration) -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            resolver,
            grace_period,
            state: Arc::new(state),
            termination: None,
            termination_deadline: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch state changes, including the timer-driven termination, so the
    /// owner can invalidate the session token.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// A token was presented; its role is being looked up.
    ///
    /// Only valid from `Unauthenticated` or `Terminated`; ignored otherwise.
    pub fn begin_authentication(&mut self) -> SessionState {
        self.apply(|current| {
            matches!(
                current,
                SessionState::Unauthenticated | SessionState::Terminated
            )
            .then_some(SessionState::Authenticating)
        })
    }

    /// Resolve the verified role for this session.
    ///
    /// Called once after authentication and again whenever the caller wants
    /// to pick up a role reassignment; nothing is pushed in between.
    /// Entering `NoAccess` schedules termination after the grace period;
    /// staying in `NoAccess` keeps the timer already running.
    ///
    /// # Panics
    ///
    /// Entering `NoAccess` spawns the grace timer and must happen inside a
    /// Tokio runtime.
    pub fn resolve(&mut self, role: &str) -> SessionState {
        let resolved = resolve_state(&self.resolver, role);
        self.apply(move |current| match current {
            SessionState::Authenticating
            | SessionState::Authorized { .. }
            | SessionState::NoAccess { .. } => Some(resolved),
            SessionState::Unauthenticated | SessionState::Terminated => {
                tracing::debug!(state = ?current, "Ignoring role resolution without authentication");
                None
            }
        })
    }

    /// Token verification failed. The gate never guesses a role.
    pub fn verification_failed(&mut self) -> SessionState {
        self.apply(|current| {
            (!matches!(current, SessionState::Unauthenticated))
                .then_some(SessionState::Unauthenticated)
        })
    }

    /// Explicit logout.
    pub fn logout(&mut self) -> SessionState {
        self.apply(|current| {
            (!matches!(current, SessionState::Terminated)).then_some(SessionState::Terminated)
        })
    }

    /// Decide a request for `path` from the current state.
    ///
    /// A terminated session re-enters `Unauthenticated` here.
    pub fn check(&mut self, path: &str) -> GateDecision {
        if matches!(self.state(), SessionState::Terminated) {
            self.apply(|current| {
                matches!(current, SessionState::Terminated).then_some(SessionState::Unauthenticated)
            });
        }

        let remaining = self
            .termination_deadline
            .map_or(self.grace_period, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });
        decide(&self.resolver, &self.state(), path, remaining)
    }

    /// Time left before a `NoAccess` session is terminated.
    #[must_use]
    pub fn termination_pending(&self) -> Option<Duration> {
        self.termination_deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Apply a transition atomically against the current state, then sync the
    /// grace timer with the resulting state.
    fn apply<F>(&mut self, transition: F) -> SessionState
    where
        F: FnOnce(&SessionState) -> Option<SessionState>,
    {
        self.state.send_if_modified(|current| match transition(current) {
            Some(next) if next != *current => {
                tracing::debug!(from = ?current, to = ?next, "Session state transition");
                *current = next;
                true
            }
            _ => false,
        });

        let state = self.state();
        if state.is_no_access() {
            if self.termination_deadline.is_none() {
                self.schedule_termination();
            }
        } else {
            self.cancel_termination();
        }
        state
    }

    fn schedule_termination(&mut self) {
        let state = Arc::clone(&self.state);
        let grace_period = self.grace_period;

        self.termination_deadline = Some(Instant::now() + grace_period);
        self.termination = Some(tokio::spawn(async move {
            tokio::time::sleep(grace_period).await;
            let terminated = state.send_if_modified(|current| {
                if current.is_no_access() {
                    *current = SessionState::Terminated;
                    true
                } else {
                    false
                }
            });
            if terminated {
                tracing::info!(
                    grace_secs = grace_period.as_secs(),
                    "No-access session terminated after grace period"
                );
            }
        }));
    }

    fn cancel_termination(&mut self) {
        if let Some(handle) = self.termination.take() {
            handle.abort();
        }
        self.termination_deadline = None;
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        self.cancel_termination();
    }
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("state", &self.state())
            .field("grace_period", &self.grace_period)
            .field("termination_deadline", &self.termination_deadline)
            .finish_non_exhaustive()
    }
}
