//! Storage collaborators consumed by the core.
//!
//! Implementations live in `warden-infra`; the core only reads.

use async_trait::async_trait;
use thiserror::Error;

use warden_core::{RoleId, UserId};

use crate::Permission;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Table of permission records, looked up by exact `(method, path)`.
#[async_trait]
pub trait PermissionRegistry: Send + Sync {
    /// Whether any permission has `metadata.method == method` and
    /// `metadata.path == path` (exact string equality, no templates).
    async fn exists_permission_for(&self, method: &str, path: &str) -> StoreResult<bool>;
}

/// User→role and role→permission relations.
#[async_trait]
pub trait RoleGraph: Send + Sync {
    async fn find_role_ids_for_user(&self, user_id: UserId) -> StoreResult<Vec<RoleId>>;

    /// All permissions granted to any of `role_ids`, in one query.
    async fn find_permissions_for_roles(&self, role_ids: &[RoleId]) -> StoreResult<Vec<Permission>>;

    /// Permissions reachable from a user; may contain duplicates.
    async fn find_permissions_for_user(&self, user_id: UserId) -> StoreResult<Vec<Permission>> {
        let role_ids = self.find_role_ids_for_user(user_id).await?;
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_permissions_for_roles(&role_ids).await
    }
}

/// Username/password lookup used by the login route.
///
/// Passwords are compared as stored.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> StoreResult<Option<UserId>>;
}
