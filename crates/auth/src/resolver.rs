//! Effective-permission resolution through the role graph.

use std::sync::Arc;

use async_trait::async_trait;

use warden_core::UserId;

use crate::PermissionSet;
use crate::store::{RoleGraph, StoreResult};

/// Computes the permissions a user reaches through its roles.
///
/// Object-safe so a caching decorator can wrap the shipped resolver without
/// touching the authorization stage.
#[async_trait]
pub trait PermissionResolver: Send + Sync {
    /// Zero roles is a valid empty set; a store failure is an error.
    async fn effective_permissions(&self, user_id: UserId) -> StoreResult<PermissionSet>;
}

/// Cache-free resolver issuing fresh role-graph queries on every call.
#[derive(Clone)]
pub struct RoleGraphResolver {
    graph: Arc<dyn RoleGraph>,
}

impl RoleGraphResolver {
    pub fn new(graph: Arc<dyn RoleGraph>) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl PermissionResolver for RoleGraphResolver {
    async fn effective_permissions(&self, user_id: UserId) -> StoreResult<PermissionSet> {
        let role_ids = self.graph.find_role_ids_for_user(user_id).await?;
        if role_ids.is_empty() {
            return Ok(PermissionSet::new());
        }

        let permissions = self.graph.find_permissions_for_roles(&role_ids).await?;
        let set: PermissionSet = permissions.into_iter().collect();
        tracing::trace!(%user_id, roles = role_ids.len(), permissions = set.len(), "resolved effective permissions");
        Ok(set)
    }
}
