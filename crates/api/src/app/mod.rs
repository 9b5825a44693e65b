//! HTTP application wiring.
//!
//! - `services.rs`: store selection and auth collaborators
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: JSON error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(router(Arc::new(services)))
}

/// Router over already-built services. Every route, whitelisted or not,
/// passes through authentication and then authorization.
pub fn router(services: Arc<AppServices>) -> Router {
    let auth_state = services.auth_state();

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth_state.clone(),
                    middleware::authenticate,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::authorize,
                ))
                .layer(Extension(services)),
        )
}

pub use services::AppServices;
