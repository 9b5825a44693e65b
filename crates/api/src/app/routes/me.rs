use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use warden_auth::{AccessError, PermissionSet};

use crate::app::{
    dto::{IdentityResponse, permission_list},
    errors,
    services::AppServices,
};
use crate::context::Identity;

/// GET /v1/me - the caller's identity as carried by its token
pub async fn whoami(identity: Option<Extension<Identity>>) -> Response {
    let Some(Extension(identity)) = identity else {
        return errors::access_error_to_response(&AccessError::Unauthenticated);
    };

    let claims = identity.claims();
    Json(IdentityResponse {
        user_id: identity.user_id().to_string(),
        issued_at: claims.iat,
        expires_at: claims.exp,
    })
    .into_response()
}

/// GET /v1/me/permissions - effective permissions reachable through roles
///
/// Uses the store's single user-to-permission query rather than the
/// two-step resolver the authorization stage runs.
pub async fn permissions(
    Extension(services): Extension<Arc<AppServices>>,
    identity: Option<Extension<Identity>>,
) -> Response {
    let Some(Extension(identity)) = identity else {
        return errors::access_error_to_response(&AccessError::Unauthenticated);
    };

    match services.role_graph.find_permissions_for_user(identity.user_id()).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(json!({ "permissions": permission_list(rows.into_iter().collect::<PermissionSet>().into_vec()) })),
        )
            .into_response(),
        Err(e) => errors::store_error(e),
    }
}
