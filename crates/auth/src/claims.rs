use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::UserId;

/// Claim set carried by an access token.
///
/// Timestamps are epoch seconds. Claims are decoded fresh for every request
/// and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: UserId, issued_at: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub,
            iat,
            exp: iat + ttl.num_seconds(),
        }
    }
}

/// Why a presented token was rejected.
///
/// All variants are caller-facing 401s; the message is what differs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("malformed token")]
    Malformed,
}

/// Deterministically validate the time window of decoded claims.
///
/// Expiry is strict (`now >= exp` fails) and no clock-skew leeway applies.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if now.timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}
