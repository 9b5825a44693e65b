use thiserror::Error;

use crate::claims::TokenError;
use crate::store::StoreError;

/// Terminal rejection produced by either pipeline stage.
///
/// Every variant is decided locally and converted straight into a response;
/// none of them reaches a handler.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("missing authorization header")]
    MissingCredential,

    #[error("authorization header must use the Bearer scheme")]
    MalformedCredential,

    #[error("invalid credential: {0}")]
    InvalidCredential(#[from] TokenError),

    #[error("authentication required")]
    Unauthenticated,

    #[error("permission denied for {method} {path}")]
    Forbidden { method: String, path: String },

    #[error("failed to resolve permissions")]
    ResolutionFailed(#[source] StoreError),
}

/// Coarse class of a rejection, mapped to a status code by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionClass {
    Unauthenticated,
    Forbidden,
    Internal,
}

impl AccessError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AccessError::MissingCredential => "missing_credential",
            AccessError::MalformedCredential => "malformed_credential",
            AccessError::InvalidCredential(_) => "invalid_credential",
            AccessError::Unauthenticated => "unauthenticated",
            AccessError::Forbidden { .. } => "forbidden",
            AccessError::ResolutionFailed(_) => "resolution_failed",
        }
    }

    pub fn class(&self) -> RejectionClass {
        match self {
            AccessError::MissingCredential
            | AccessError::MalformedCredential
            | AccessError::InvalidCredential(_)
            | AccessError::Unauthenticated => RejectionClass::Unauthenticated,
            AccessError::Forbidden { .. } => RejectionClass::Forbidden,
            AccessError::ResolutionFailed(_) => RejectionClass::Internal,
        }
    }
}
