//! Storage collaborators for the authorization core.
//!
//! Both stores implement `PermissionRegistry`, `RoleGraph` and
//! `CredentialStore` from `warden-auth`; the core only ever reads.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryAuthStore;
pub use postgres::PostgresAuthStore;
