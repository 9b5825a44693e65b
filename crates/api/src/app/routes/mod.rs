use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod me;
pub mod roles;
pub mod system;

/// Router for everything under the versioned API root.
pub fn router() -> Router {
    Router::new()
        .route("/v1/login", post(auth::login))
        .route("/v1/refresh", post(auth::refresh))
        .route("/v1/me", get(me::whoami))
        .route("/v1/me/permissions", get(me::permissions))
        .route("/v1/roles/:id/permissions", get(roles::permissions))
}
