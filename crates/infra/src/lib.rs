//! Infrastructure layer: storage collaborators for the authorization core.

pub mod store;

pub use store::{InMemoryAuthStore, PostgresAuthStore};
