//! The two request-pipeline stages, as axum middleware.
//!
//! `authenticate` must wrap `authorize`; both short-circuit with a terminal
//! JSON response on rejection.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use warden_auth::{AccessError, Authentication, Authenticator, Authorizer, RejectionClass};

use crate::app::errors::access_error_to_response;
use crate::context::Identity;

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<Authenticator>,
    pub authorizer: Arc<Authorizer>,
}

pub async fn authenticate(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let outcome = state.authenticator.authenticate(
        req.uri().path(),
        req.headers().get(header::AUTHORIZATION).map(|v| v.as_bytes()),
    );

    match outcome {
        Ok(Authentication::Anonymous) => next.run(req).await,
        Ok(Authentication::Identified(claims)) => {
            req.extensions_mut().insert(Identity::new(claims));
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(path = req.uri().path(), kind = e.kind(), error = %e, "authentication rejected");
            access_error_to_response(&e)
        }
    }
}

pub async fn authorize(State(state): State<AuthState>, req: Request, next: Next) -> Response {
    let identity = req.extensions().get::<Identity>().map(Identity::user_id);
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();

    match state.authorizer.authorize(identity, &method, &path).await {
        Ok(decision) => {
            tracing::trace!(%method, %path, ?decision, "request authorized");
            next.run(req).await
        }
        Err(e) => {
            log_rejection(&e, &method, &path);
            access_error_to_response(&e)
        }
    }
}

fn log_rejection(e: &AccessError, method: &str, path: &str) {
    match e.class() {
        // Storage failures are already logged with the user id by the authorizer.
        RejectionClass::Internal => {}
        _ => tracing::debug!(method, path, kind = e.kind(), "authorization rejected"),
    }
}
