//! Role-based access control for dashboard navigation.
//!
//! Data flows one way:
//! - [`RoleHierarchy`] and [`TabRegistry`] hold immutable configuration
//! - [`PermissionResolver`] answers tab visibility, route and capability queries
//! - [`crate::session`] turns those answers into per-session decisions

pub mod capability;
pub mod hierarchy;
pub mod icons;
pub mod registry;
pub mod resolver;

pub use capability::{Capabilities, CapabilityPolicy};
pub use hierarchy::{HierarchyError, RoleHierarchy};
pub use icons::{get_icon, IconRef};
pub use registry::{RegistryError, TabDefinition, TabRegistry};
pub use resolver::{route_matches, PermissionResolver};
