use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use warden_core::PermissionId;

/// Kind tag for permissions that guard an HTTP route.
pub const KIND_ROUTE: &str = "route";

/// Routing metadata attached to a permission record.
///
/// A permission only takes part in HTTP authorization when both `method` and
/// `path` are set; `code` carries non-routable feature flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Path template, e.g. `/v1/role/:id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A permission record from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub kind: String,
    pub metadata: PermissionMetadata,
}

impl Permission {
    /// Build a routable permission for `method` on `path`.
    pub fn route(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: PermissionId::new(),
            kind: KIND_ROUTE.to_string(),
            metadata: PermissionMetadata {
                method: Some(method.into()),
                path: Some(path.into()),
                code: None,
            },
        }
    }

    /// Build a non-routable permission identified by a feature code.
    pub fn feature(code: impl Into<String>) -> Self {
        Self {
            id: PermissionId::new(),
            kind: "feature".to_string(),
            metadata: PermissionMetadata {
                code: Some(code.into()),
                ..Default::default()
            },
        }
    }

    /// `(method, path template)` when this permission can guard a route.
    pub fn route_target(&self) -> Option<(&str, &str)> {
        match (&self.metadata.method, &self.metadata.path) {
            (Some(method), Some(path)) => Some((method.as_str(), path.as_str())),
            _ => None,
        }
    }
}

/// Effective permissions of a user, de-duplicated by permission id.
///
/// Iteration order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    by_id: HashMap<PermissionId, Permission>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a permission; returns `false` if its id was already present.
    pub fn insert(&mut self, permission: Permission) -> bool {
        if self.by_id.contains_key(&permission.id) {
            return false;
        }
        self.by_id.insert(permission.id, permission);
        true
    }

    pub fn contains(&self, id: &PermissionId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.by_id.values()
    }

    pub fn into_vec(self) -> Vec<Permission> {
        self.by_id.into_values().collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = Self::new();
        for permission in iter {
            set.insert(permission);
        }
        set
    }
}
