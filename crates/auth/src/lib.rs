//! `warden-auth` — request authentication and authorization core.
//!
//! This crate is intentionally decoupled from HTTP; storage is reached only
//! through the collaborator traits in [`store`].

pub mod authenticate;
pub mod authorize;
pub mod claims;
pub mod error;
pub mod permissions;
pub mod resolver;
pub mod roles;
pub mod rules;
pub mod store;
pub mod template;
pub mod token;

pub use authenticate::{Authentication, Authenticator};
pub use authorize::{Authorizer, Decision, find_grant};
pub use claims::{Claims, TokenError, validate_claims};
pub use error::{AccessError, RejectionClass};
pub use permissions::{KIND_ROUTE, Permission, PermissionMetadata, PermissionSet};
pub use resolver::{PermissionResolver, RoleGraphResolver};
pub use roles::{RolePermission, UserRole};
pub use rules::{AccessRule, AccessRules, MatchKind, RuleScope, Stage};
pub use store::{CredentialStore, PermissionRegistry, RoleGraph, StoreError, StoreResult};
pub use token::{SigningError, TokenCodec, TokenPair};
