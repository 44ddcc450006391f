//! `DesignOS` Common Library
//!
//! Role and navigation types shared by the server and the dashboard client.

pub mod error;
pub mod types;

pub use error::UnknownRoleError;
pub use types::*;
