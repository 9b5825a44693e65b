use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use warden_auth::{
    CredentialStore, Permission, PermissionRegistry, RoleGraph, RolePermission, StoreError,
    StoreResult, UserRole,
};
use warden_core::{PermissionId, RoleId, UserId};

#[derive(Debug)]
struct UserRecord {
    username: String,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, UserRecord>,
    roles: HashSet<RoleId>,
    permissions: HashMap<PermissionId, Permission>,
    user_roles: Vec<UserRole>,
    role_permissions: Vec<RolePermission>,
}

/// In-memory users, roles, permissions and their associations.
///
/// Intended for tests/dev. Association edges are kept as plain lists, so
/// duplicates behave like duplicate rows in a join table.
#[derive(Debug, Default)]
pub struct InMemoryAuthStore {
    state: RwLock<State>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }

    pub fn add_user(&self, username: impl Into<String>, password: impl Into<String>) -> StoreResult<UserId> {
        let id = UserId::new();
        self.write()?.users.insert(
            id,
            UserRecord {
                username: username.into(),
                password: password.into(),
            },
        );
        Ok(id)
    }

    pub fn add_role(&self) -> StoreResult<RoleId> {
        let id = RoleId::new();
        self.write()?.roles.insert(id);
        Ok(id)
    }

    pub fn add_permission(&self, permission: Permission) -> StoreResult<PermissionId> {
        let id = permission.id;
        self.write()?.permissions.insert(id, permission);
        Ok(id)
    }

    pub fn grant_permission(&self, role_id: RoleId, permission_id: PermissionId) -> StoreResult<()> {
        self.write()?.role_permissions.push(RolePermission {
            role_id,
            permission_id,
        });
        Ok(())
    }

    pub fn assign_role(&self, user_id: UserId, role_id: RoleId) -> StoreResult<()> {
        self.write()?.user_roles.push(UserRole { user_id, role_id });
        Ok(())
    }
}

#[async_trait]
impl PermissionRegistry for InMemoryAuthStore {
    async fn exists_permission_for(&self, method: &str, path: &str) -> StoreResult<bool> {
        Ok(self.read()?.permissions.values().any(|p| {
            p.metadata.method.as_deref() == Some(method) && p.metadata.path.as_deref() == Some(path)
        }))
    }
}

#[async_trait]
impl RoleGraph for InMemoryAuthStore {
    async fn find_role_ids_for_user(&self, user_id: UserId) -> StoreResult<Vec<RoleId>> {
        Ok(self
            .read()?
            .user_roles
            .iter()
            .filter(|edge| edge.user_id == user_id)
            .map(|edge| edge.role_id)
            .collect())
    }

    async fn find_permissions_for_roles(&self, role_ids: &[RoleId]) -> StoreResult<Vec<Permission>> {
        let state = self.read()?;
        Ok(state
            .role_permissions
            .iter()
            .filter(|edge| role_ids.contains(&edge.role_id))
            .filter_map(|edge| state.permissions.get(&edge.permission_id).cloned())
            .collect())
    }
}

#[async_trait]
impl CredentialStore for InMemoryAuthStore {
    async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> StoreResult<Option<UserId>> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|(_, user)| user.username == username && user.password == password)
            .map(|(id, _)| *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registry_lookup_is_exact_on_method_and_path() {
        let store = InMemoryAuthStore::new();
        store.add_permission(Permission::route("GET", "/v1/role/:id")).unwrap();
        store.add_permission(Permission::feature("ui.export")).unwrap();

        assert!(store.exists_permission_for("GET", "/v1/role/:id").await.unwrap());
        assert!(!store.exists_permission_for("GET", "/v1/role/42").await.unwrap());
        assert!(!store.exists_permission_for("POST", "/v1/role/:id").await.unwrap());
    }

    #[tokio::test]
    async fn permissions_are_reachable_through_roles() {
        let store = InMemoryAuthStore::new();
        let user = store.add_user("alice", "pw").unwrap();
        let (admin, auditor) = (store.add_role().unwrap(), store.add_role().unwrap());
        let read = store.add_permission(Permission::route("GET", "/v1/users")).unwrap();
        let write = store.add_permission(Permission::route("POST", "/v1/users")).unwrap();
        store.grant_permission(admin, read).unwrap();
        store.grant_permission(admin, write).unwrap();
        store.grant_permission(auditor, read).unwrap();
        store.assign_role(user, admin).unwrap();
        store.assign_role(user, auditor).unwrap();

        let roles = store.find_role_ids_for_user(user).await.unwrap();
        assert_eq!(roles.len(), 2);

        // The join returns one row per edge; de-duplication is the resolver's job.
        let via_roles = store.find_permissions_for_roles(&roles).await.unwrap();
        assert_eq!(via_roles.len(), 3);
        let via_user = store.find_permissions_for_user(user).await.unwrap();
        assert_eq!(via_user.len(), 3);
    }

    #[tokio::test]
    async fn user_without_roles_reaches_nothing() {
        let store = InMemoryAuthStore::new();
        let user = store.add_user("bob", "pw").unwrap();

        assert!(store.find_role_ids_for_user(user).await.unwrap().is_empty());
        assert!(store.find_permissions_for_user(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn credentials_match_on_username_and_password() {
        let store = InMemoryAuthStore::new();
        let alice = store.add_user("alice", "secret").unwrap();

        assert_eq!(
            store.find_user_by_credentials("alice", "secret").await.unwrap(),
            Some(alice)
        );
        assert_eq!(store.find_user_by_credentials("alice", "nope").await.unwrap(), None);
        assert_eq!(store.find_user_by_credentials("carol", "secret").await.unwrap(), None);
    }
}
