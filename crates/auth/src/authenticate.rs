//! Authentication stage: whitelist, bearer header, token verification.
//!
//! Transport-agnostic; the HTTP layer passes the raw header bytes.

use std::sync::Arc;

use crate::claims::Claims;
use crate::error::AccessError;
use crate::rules::{AccessRules, Stage};
use crate::token::TokenCodec;

/// Outcome of a successful authentication pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authentication {
    /// Whitelisted path: forwarded without an identity.
    Anonymous,
    /// Token verified; the claims identify the caller.
    Identified(Claims),
}

#[derive(Clone)]
pub struct Authenticator {
    codec: TokenCodec,
    rules: Arc<AccessRules>,
}

impl Authenticator {
    pub fn new(codec: TokenCodec, rules: Arc<AccessRules>) -> Self {
        Self { codec, rules }
    }

    /// Run the stage for a request to `path` carrying `authorization`.
    pub fn authenticate(
        &self,
        path: &str,
        authorization: Option<&[u8]>,
    ) -> Result<Authentication, AccessError> {
        if self.rules.exempts(Stage::Authentication, path) {
            return Ok(Authentication::Anonymous);
        }

        let header = authorization.ok_or(AccessError::MissingCredential)?;
        let token = extract_bearer(header)?;
        let claims = self.codec.verify(token)?;

        Ok(Authentication::Identified(claims))
    }
}

fn extract_bearer(header: &[u8]) -> Result<&str, AccessError> {
    let header = std::str::from_utf8(header).map_err(|_| AccessError::MalformedCredential)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AccessError::MalformedCredential)?
        .trim();
    if token.is_empty() {
        return Err(AccessError::MalformedCredential);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use warden_core::UserId;

    use super::*;
    use crate::claims::TokenError;

    fn authenticator() -> (Authenticator, TokenCodec) {
        let codec = TokenCodec::new(b"test-secret", Duration::minutes(10), Duration::days(1));
        let auth = Authenticator::new(codec.clone(), Arc::new(AccessRules::defaults()));
        (auth, codec)
    }

    #[test]
    fn whitelisted_path_skips_credentials_entirely() {
        let (auth, _) = authenticator();
        assert_eq!(
            auth.authenticate("/v1/login", None).unwrap(),
            Authentication::Anonymous
        );
        assert_eq!(
            auth.authenticate("/public/a.css", Some(b"Bearer garbage")).unwrap(),
            Authentication::Anonymous
        );
    }

    #[test]
    fn missing_header_is_missing_credential() {
        let (auth, _) = authenticator();
        let err = auth.authenticate("/v1/me", None).unwrap_err();
        assert!(matches!(err, AccessError::MissingCredential));
        assert_eq!(err.to_string(), "missing authorization header");
    }

    #[test]
    fn wrong_scheme_is_malformed_credential() {
        let (auth, _) = authenticator();
        let headers: [&[u8]; 5] = [b"Basic dXNlcjpwYXNz", b"Bearer", b"Bearer   ", b"bearer abc", b"\xff\xfe"];
        for header in headers {
            let err = auth.authenticate("/v1/me", Some(header)).unwrap_err();
            assert!(matches!(err, AccessError::MalformedCredential), "{header:?}");
        }
    }

    #[test]
    fn token_failures_are_invalid_credential_with_reason() {
        let (auth, codec) = authenticator();

        let expired = codec
            .issue_at(UserId::new(), Duration::minutes(1), Utc::now() - Duration::hours(1))
            .unwrap();
        let header = format!("Bearer {expired}");
        let err = auth.authenticate("/v1/me", Some(header.as_bytes())).unwrap_err();
        assert!(matches!(err, AccessError::InvalidCredential(TokenError::Expired)));

        let err = auth.authenticate("/v1/me", Some(b"Bearer abc.def.ghi")).unwrap_err();
        assert!(matches!(err, AccessError::InvalidCredential(TokenError::Malformed)));
    }

    #[test]
    fn valid_token_identifies_the_subject() {
        let (auth, codec) = authenticator();
        let user = UserId::new();
        let token = codec.issue(user, Duration::minutes(5)).unwrap();
        let header = format!("Bearer {token}");

        match auth.authenticate("/v1/me", Some(header.as_bytes())).unwrap() {
            Authentication::Identified(claims) => assert_eq!(claims.sub, user),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
