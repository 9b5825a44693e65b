//! Storage and auth wiring shared by the middleware and the handlers.

use std::sync::Arc;

use anyhow::Context;

use warden_auth::{
    AccessRules, Authenticator, Authorizer, CredentialStore, Permission, PermissionRegistry,
    PermissionResolver, RoleGraph, RoleGraphResolver, StoreResult, TokenCodec,
};
use warden_infra::{InMemoryAuthStore, PostgresAuthStore};

use crate::config::AppConfig;
use crate::middleware::AuthState;

/// Everything a request needs, built once at startup.
#[derive(Clone)]
pub struct AppServices {
    pub codec: TokenCodec,
    pub rules: Arc<AccessRules>,
    pub gated_prefix: String,
    pub credentials: Arc<dyn CredentialStore>,
    pub registry: Arc<dyn PermissionRegistry>,
    pub role_graph: Arc<dyn RoleGraph>,
    pub resolver: Arc<dyn PermissionResolver>,
}

impl AppServices {
    /// Wire every collaborator onto one backing store.
    pub fn from_store<S>(config: &AppConfig, store: Arc<S>) -> Self
    where
        S: CredentialStore + PermissionRegistry + RoleGraph + 'static,
    {
        let role_graph: Arc<dyn RoleGraph> = store.clone();
        Self {
            codec: TokenCodec::new(config.jwt_secret.as_bytes(), config.access_ttl, config.refresh_ttl),
            rules: Arc::new(config.access_rules.clone()),
            gated_prefix: config.gated_prefix.clone(),
            credentials: store.clone(),
            registry: store,
            resolver: Arc::new(RoleGraphResolver::new(role_graph.clone())),
            role_graph,
        }
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState {
            authenticator: Arc::new(Authenticator::new(self.codec.clone(), self.rules.clone())),
            authorizer: Arc::new(Authorizer::new(
                self.registry.clone(),
                self.resolver.clone(),
                self.rules.clone(),
                self.gated_prefix.clone(),
            )),
        }
    }
}

/// Postgres when `DATABASE_URL` is configured, otherwise a seeded in-memory store.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresAuthStore::connect(url)
                .await
                .context("connect permission store")?;
            Ok(AppServices::from_store(config, Arc::new(store)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store with a dev account");
            let store = Arc::new(InMemoryAuthStore::new());
            seed_dev_store(&store).context("seed in-memory store")?;
            Ok(AppServices::from_store(config, store))
        }
    }
}

/// One `admin`/`admin` account whose role may list its own permissions.
fn seed_dev_store(store: &InMemoryAuthStore) -> StoreResult<()> {
    let admin = store.add_user("admin", "admin")?;
    let role = store.add_role()?;
    let permission = store.add_permission(Permission::route("GET", "/v1/me/permissions"))?;
    store.grant_permission(role, permission)?;
    store.assign_role(admin, role)?;
    tracing::info!(user_id = %admin, role_id = %role, "seeded dev account");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dev_store_grants_its_own_permission_listing() {
        let store = InMemoryAuthStore::new();
        seed_dev_store(&store).unwrap();

        let user = store
            .find_user_by_credentials("admin", "admin")
            .await
            .unwrap()
            .expect("seeded user");
        assert!(store.exists_permission_for("GET", "/v1/me/permissions").await.unwrap());
        assert_eq!(store.find_permissions_for_user(user).await.unwrap().len(), 1);
    }
}
