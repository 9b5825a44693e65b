//! Postgres-backed collaborator store.
//!
//! Reads the normalized schema:
//!
//! | table              | columns                                  |
//! |--------------------|------------------------------------------|
//! | `users`            | `id uuid`, `username text`, `password text` |
//! | `roles`            | `id uuid`                                |
//! | `permissions`      | `id uuid`, `kind text`, `metadata jsonb` |
//! | `user_roles`       | `user_id uuid`, `role_id uuid`           |
//! | `role_permissions` | `role_id uuid`, `permission_id uuid`     |
//!
//! Schema creation and migration are owned elsewhere. Every query is a plain
//! future; dropping it (request cancelled) abandons the query.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use warden_auth::{
    CredentialStore, Permission, PermissionMetadata, PermissionRegistry, RoleGraph, StoreError,
    StoreResult,
};
use warden_core::{PermissionId, RoleId, UserId};

const PERMISSION_COLUMNS: &str = "p.id, p.kind, p.metadata";

#[derive(Clone)]
pub struct PostgresAuthStore {
    pool: PgPool,
}

impl PostgresAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("connect to postgres")?;
        tracing::info!("postgres auth store connected");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn backend(err: sqlx::Error, what: &'static str) -> StoreError {
    StoreError::Backend(anyhow::Error::new(err).context(what))
}

fn permission_from_row(row: &PgRow) -> Result<Permission, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let kind: String = row.try_get("kind")?;
    let Json(metadata): Json<PermissionMetadata> = row.try_get("metadata")?;
    Ok(Permission {
        id: PermissionId::from_uuid(id),
        kind,
        metadata,
    })
}

fn permissions_from_rows(rows: Vec<PgRow>, what: &'static str) -> StoreResult<Vec<Permission>> {
    rows.iter()
        .map(permission_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| backend(e, what))
}

#[async_trait]
impl PermissionRegistry for PostgresAuthStore {
    async fn exists_permission_for(&self, method: &str, path: &str) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM permissions
                WHERE metadata->>'method' = $1 AND metadata->>'path' = $2
            )
            "#,
        )
        .bind(method)
        .bind(path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| backend(e, "permission registry lookup"))
    }
}

#[async_trait]
impl RoleGraph for PostgresAuthStore {
    async fn find_role_ids_for_user(&self, user_id: UserId) -> StoreResult<Vec<RoleId>> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT role_id FROM user_roles WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| backend(e, "load user roles"))?;
        Ok(ids.into_iter().map(RoleId::from_uuid).collect())
    }

    async fn find_permissions_for_roles(&self, role_ids: &[RoleId]) -> StoreResult<Vec<Permission>> {
        let role_ids: Vec<Uuid> = role_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PERMISSION_COLUMNS}
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = ANY($1)
            "#
        ))
        .bind(&role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| backend(e, "load role permissions"))?;

        permissions_from_rows(rows, "decode role permissions")
    }

    async fn find_permissions_for_user(&self, user_id: UserId) -> StoreResult<Vec<Permission>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PERMISSION_COLUMNS}
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            JOIN user_roles ur ON ur.role_id = rp.role_id
            WHERE ur.user_id = $1
            "#
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| backend(e, "load user permissions"))?;

        permissions_from_rows(rows, "decode user permissions")
    }
}

#[async_trait]
impl CredentialStore for PostgresAuthStore {
    async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> StoreResult<Option<UserId>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE username = $1 AND password = $2",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| backend(e, "credential lookup"))?;
        Ok(id.map(UserId::from_uuid))
    }
}
