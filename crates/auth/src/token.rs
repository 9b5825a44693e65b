//! Signed token issuing and verification (HS256).

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::Serialize;
use thiserror::Error;

use warden_core::UserId;

use crate::claims::{Claims, TokenError, validate_claims};

/// The single symmetric scheme accepted for signing and verification.
const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error)]
#[error("failed to sign token: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

/// Access + refresh token pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Encodes and decodes claim sets with a server-held secret.
///
/// Cheap to clone; keys and validation rules are shared.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked by `validate_claims` so the boundary stays strict.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret)),
            validation: Arc::new(validation),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    pub fn issue(&self, subject: UserId, ttl: Duration) -> Result<String, SigningError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: UserId,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, SigningError> {
        let claims = Claims::new(subject, now, ttl);
        Ok(jsonwebtoken::encode(
            &Header::new(ALGORITHM),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Issue an access token and a refresh token using the configured TTLs.
    pub fn issue_pair(&self, subject: UserId) -> Result<TokenPair, SigningError> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.issue_at(subject, self.access_ttl, now)?,
            refresh_token: self.issue_at(subject, self.refresh_ttl, now)?,
            token_type: "Bearer",
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature, shape and expiry. Claims are returned unchanged.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        // `none` and unknown names never reach `decode` as algorithm errors.
        if let Some(alg) = header_alg(token) {
            if alg.parse::<Algorithm>().ok() != Some(ALGORITHM) {
                return Err(TokenError::InvalidSignature);
            }
        }

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;

        if data.claims.sub.as_uuid().is_nil() {
            return Err(TokenError::Malformed);
        }
        validate_claims(&data.claims, now)?;

        Ok(data.claims)
    }
}

/// `alg` as written in the token header, if the header decodes at all.
fn header_alg(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;
    let raw = URL_SAFE_NO_PAD.decode(segment).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&raw).ok()?;
    header.get("alg")?.as_str().map(str::to_owned)
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
