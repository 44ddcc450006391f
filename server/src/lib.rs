//! `DesignOS` Access Server
//!
//! Role-based navigation and session gating for the `DesignOS` dashboard.
//! Decides which tabs a role sees, which routes it may open, and what
//! happens to sessions whose role grants nothing.

pub mod api;
pub mod auth;
pub mod config;
pub mod permissions;
pub mod session;
