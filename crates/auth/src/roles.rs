use serde::{Deserialize, Serialize};

use warden_core::{PermissionId, RoleId, UserId};

/// `(user, role)` assignment edge in the role graph.
///
/// Duplicate edges are tolerated; they only cost de-duplication work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRole {
    pub user_id: UserId,
    pub role_id: RoleId,
}

/// `(role, permission)` grant edge in the role graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolePermission {
    pub role_id: RoleId,
    pub permission_id: PermissionId,
}
