//! Session gate.
//!
//! Bridges the permission resolver to request handling: default landing
//! routes, route gating, and the no-access grace period.

pub mod decision;
pub mod gate;
pub mod state;
pub mod store;

pub use decision::{decide, evaluate, resolve_state, AuthOutcome};
pub use gate::{SessionGate, DEFAULT_GRACE_PERIOD};
pub use state::{GateDecision, SessionState};
pub use store::{SessionKey, SessionStore};
