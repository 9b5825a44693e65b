//! Authorization stage: per-route decision for an identified caller.

use std::sync::Arc;

use warden_core::{PermissionId, UserId};

use crate::error::AccessError;
use crate::resolver::PermissionResolver;
use crate::rules::{AccessRules, Stage};
use crate::store::PermissionRegistry;
use crate::{PermissionSet, template};

/// Why a request was allowed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Path outside the gated prefix.
    OutOfScope,
    /// Path exempt from authorization by an access rule.
    Whitelisted,
    /// No registry entry for `(method, path)`: permitted (fail-open).
    Ungated,
    /// Caller holds the given permission.
    Granted(PermissionId),
}

#[derive(Clone)]
pub struct Authorizer {
    registry: Arc<dyn PermissionRegistry>,
    resolver: Arc<dyn PermissionResolver>,
    rules: Arc<AccessRules>,
    gated_prefix: String,
}

impl Authorizer {
    pub fn new(
        registry: Arc<dyn PermissionRegistry>,
        resolver: Arc<dyn PermissionResolver>,
        rules: Arc<AccessRules>,
        gated_prefix: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            resolver,
            rules,
            gated_prefix: gated_prefix.into(),
        }
    }

    /// Decide whether `identity` may call `method path`.
    ///
    /// The registry lookup always precedes the effective-permission fetch, and
    /// the fetch is skipped for ungated routes.
    pub async fn authorize(
        &self,
        identity: Option<UserId>,
        method: &str,
        path: &str,
    ) -> Result<Decision, AccessError> {
        if !path.starts_with(&self.gated_prefix) {
            return Ok(Decision::OutOfScope);
        }
        if self.rules.exempts(Stage::Authorization, path) {
            return Ok(Decision::Whitelisted);
        }

        let user_id = identity.ok_or(AccessError::Unauthenticated)?;

        let gated = self
            .registry
            .exists_permission_for(method, path)
            .await
            .map_err(|e| {
                tracing::error!(%user_id, method, path, error = %e, "permission registry lookup failed");
                AccessError::ResolutionFailed(e)
            })?;
        if !gated {
            // Unregistered routes stay reachable until their permission is back-filled.
            tracing::debug!(%user_id, method, path, ungated = true, "no registry entry; permitting");
            return Ok(Decision::Ungated);
        }

        let permissions = self
            .resolver
            .effective_permissions(user_id)
            .await
            .map_err(|e| {
                tracing::error!(%user_id, method, path, error = %e, "effective permission resolution failed");
                AccessError::ResolutionFailed(e)
            })?;

        match find_grant(&permissions, method, path) {
            Some(permission_id) => Ok(Decision::Granted(permission_id)),
            None => Err(AccessError::Forbidden {
                method: method.to_string(),
                path: path.to_string(),
            }),
        }
    }
}

/// First permission whose method equals `method` and whose template matches
/// `path`. Permissions without routing metadata never match.
pub fn find_grant(permissions: &PermissionSet, method: &str, path: &str) -> Option<PermissionId> {
    permissions
        .iter()
        .find(|permission| match permission.route_target() {
            Some((m, t)) => m == method && template::matches(t, path),
            None => false,
        })
        .map(|permission| permission.id)
}
