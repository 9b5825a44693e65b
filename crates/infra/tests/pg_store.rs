#![cfg(feature = "pg-tests")]

use sqlx::PgPool;
use uuid::Uuid;

use warden_auth::{CredentialStore, PermissionRegistry, RoleGraph};
use warden_core::UserId;
use warden_infra::PostgresAuthStore;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (id uuid PRIMARY KEY, username text NOT NULL, password text NOT NULL)",
    "CREATE TABLE IF NOT EXISTS roles (id uuid PRIMARY KEY)",
    "CREATE TABLE IF NOT EXISTS permissions (id uuid PRIMARY KEY, kind text NOT NULL, metadata jsonb NOT NULL)",
    "CREATE TABLE IF NOT EXISTS user_roles (user_id uuid NOT NULL, role_id uuid NOT NULL)",
    "CREATE TABLE IF NOT EXISTS role_permissions (role_id uuid NOT NULL, permission_id uuid NOT NULL)",
    "TRUNCATE users, roles, permissions, user_roles, role_permissions",
];

async fn pg_store() -> Option<PostgresAuthStore> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping pg-tests: set DATABASE_URL");
            return None;
        }
    };
    let pool = match PgPool::connect(&url).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("skipping pg-tests: cannot connect to postgres: {err}");
            return None;
        }
    };
    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    Some(PostgresAuthStore::new(pool))
}

async fn insert_permission(pool: &PgPool, metadata: serde_json::Value) -> Uuid {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO permissions (id, kind, metadata) VALUES ($1, 'route', $2)")
        .bind(id)
        .bind(sqlx::types::Json(metadata))
        .execute(pool)
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn postgres_store_round_trip() {
    let Some(store) = pg_store().await else {
        return;
    };
    let pool = store.pool().clone();

    let (user, role_a, role_b) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
    sqlx::query("INSERT INTO users (id, username, password) VALUES ($1, 'alice', 'pw')")
        .bind(user)
        .execute(&pool)
        .await
        .unwrap();
    let read = insert_permission(&pool, serde_json::json!({ "method": "GET", "path": "/v1/users" })).await;
    let write = insert_permission(&pool, serde_json::json!({ "method": "POST", "path": "/v1/users" })).await;
    for (role, permission) in [(role_a, read), (role_a, write), (role_b, read)] {
        sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
            .bind(role)
            .bind(permission)
            .execute(&pool)
            .await
            .unwrap();
    }
    for role in [role_a, role_b] {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user)
            .bind(role)
            .execute(&pool)
            .await
            .unwrap();
    }

    let user_id = UserId::from_uuid(user);
    assert_eq!(
        store.find_user_by_credentials("alice", "pw").await.unwrap(),
        Some(user_id)
    );
    assert!(store.exists_permission_for("GET", "/v1/users").await.unwrap());
    assert!(!store.exists_permission_for("DELETE", "/v1/users").await.unwrap());

    let roles = store.find_role_ids_for_user(user_id).await.unwrap();
    assert_eq!(roles.len(), 2);
    assert_eq!(store.find_permissions_for_roles(&roles).await.unwrap().len(), 3);
    assert_eq!(store.find_permissions_for_user(user_id).await.unwrap().len(), 3);
}
