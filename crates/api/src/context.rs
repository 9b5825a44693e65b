use warden_auth::Claims;
use warden_core::UserId;

/// Authenticated caller, injected into request extensions by the
/// authentication stage.
///
/// Request-local: it is dropped with the request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Identity {
    claims: Claims,
}

impl Identity {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn user_id(&self) -> UserId {
        self.claims.sub
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
