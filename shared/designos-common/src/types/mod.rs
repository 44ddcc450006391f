//! Shared types.

pub mod icon;
pub mod role;

pub use icon::IconName;
pub use role::{Role, RoleSet};
