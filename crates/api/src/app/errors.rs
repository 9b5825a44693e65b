use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use warden_auth::{AccessError, RejectionClass};

pub fn access_error_to_response(err: &AccessError) -> axum::response::Response {
    let status = match err.class() {
        RejectionClass::Unauthenticated => StatusCode::UNAUTHORIZED,
        RejectionClass::Forbidden => StatusCode::FORBIDDEN,
        RejectionClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(status, err.kind(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn store_error(err: impl std::fmt::Display) -> axum::response::Response {
    tracing::error!(error = %err, "store query failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "storage query failed")
}
