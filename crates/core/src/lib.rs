//! `warden-core` — identifiers and error primitives shared by every crate.
//!
//! This crate contains no IO and no HTTP concerns.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{PermissionId, RoleId, UserId};
