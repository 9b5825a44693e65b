//! Login and token refresh. Both paths are whitelisted by default.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use warden_auth::AccessError;
use warden_core::UserId;

use crate::app::{
    dto::{LoginRequest, RefreshRequest},
    errors,
    services::AppServices,
};

/// POST /v1/login - exchange username/password for a token pair
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let user_id = match services
        .credentials
        .find_user_by_credentials(&body.username, &body.password)
        .await
    {
        Ok(Some(user_id)) => user_id,
        Ok(None) => {
            tracing::debug!(username = %body.username, "login rejected");
            return errors::json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_login",
                "invalid username or password",
            );
        }
        Err(e) => return errors::store_error(e),
    };

    issue_pair(&services, user_id)
}

/// POST /v1/refresh - exchange a still-valid token for a fresh pair
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RefreshRequest>,
) -> Response {
    match services.codec.verify(&body.refresh_token) {
        Ok(claims) => issue_pair(&services, claims.sub),
        Err(e) => errors::access_error_to_response(&AccessError::from(e)),
    }
}

fn issue_pair(services: &AppServices, user_id: UserId) -> Response {
    match services.codec.issue_pair(user_id) {
        Ok(pair) => (StatusCode::OK, Json(pair)).into_response(),
        Err(e) => {
            tracing::error!(%user_id, error = %e, "token signing failed");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", "failed to issue token")
        }
    }
}
