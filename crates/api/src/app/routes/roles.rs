use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use warden_auth::PermissionSet;
use warden_core::RoleId;

use crate::app::{dto::permission_list, errors, services::AppServices};

/// GET /v1/roles/:id/permissions - permissions granted directly to a role
pub async fn permissions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let role_id: RoleId = match id.parse() {
        Ok(role_id) => role_id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("{e}")),
    };

    match services.role_graph.find_permissions_for_roles(&[role_id]).await {
        Ok(rows) => {
            let set: PermissionSet = rows.into_iter().collect();
            (
                StatusCode::OK,
                Json(json!({
                    "role_id": role_id.to_string(),
                    "permissions": permission_list(set.into_vec()),
                })),
            )
                .into_response()
        }
        Err(e) => errors::store_error(e),
    }
}
