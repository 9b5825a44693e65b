use serde::{Deserialize, Serialize};

use warden_auth::{Permission, PermissionMetadata};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub user_id: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub id: String,
    pub kind: String,
    pub metadata: PermissionMetadata,
}

impl From<Permission> for PermissionResponse {
    fn from(p: Permission) -> Self {
        Self {
            id: p.id.to_string(),
            kind: p.kind,
            metadata: p.metadata,
        }
    }
}

/// Stable ordering for list responses (by id).
pub fn permission_list(permissions: Vec<Permission>) -> Vec<PermissionResponse> {
    let mut out: Vec<PermissionResponse> = permissions.into_iter().map(Into::into).collect();
    out.sort_by(|a, b| a.id.cmp(&b.id));
    out
}
