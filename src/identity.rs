//! Resolution of session tokens into user ids.
//!
//! Accounts, OTP verification and password handling live in the identity
//! service; this crate only needs to trust the tokens it issues.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub trait IdentityResolver: Send + Sync + 'static {
    /// Returns the authenticated user, or `None` for a missing/invalid session.
    fn resolve(&self, token: &str) -> Option<Uuid>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

/// HS256 session tokens whose `sub` claim is the user id.
pub struct JwtIdentityResolver {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtIdentityResolver {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}

impl IdentityResolver for JwtIdentityResolver {
    fn resolve(&self, token: &str) -> Option<Uuid> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Uuid::parse_str(&data.claims.sub).ok(),
            Err(e) => {
                log::debug!("Rejected session token: {}", e);
                None
            }
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_to_user() {
        let resolver = JwtIdentityResolver::new("test-secret");
        let user = Uuid::new_v4();
        let token = resolver.issue(user, Duration::hours(1)).expect("issue failed");

        assert_eq!(resolver.resolve(&token), Some(user));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = JwtIdentityResolver::new("one-secret");
        let verifier = JwtIdentityResolver::new("another-secret");
        let token = issuer
            .issue(Uuid::new_v4(), Duration::hours(1))
            .expect("issue failed");

        assert_eq!(verifier.resolve(&token), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let resolver = JwtIdentityResolver::new("test-secret");
        let token = resolver
            .issue(Uuid::new_v4(), Duration::hours(-2))
            .expect("issue failed");

        assert_eq!(resolver.resolve(&token), None);
    }

    #[test]
    fn garbage_is_rejected() {
        let resolver = JwtIdentityResolver::new("test-secret");
        assert_eq!(resolver.resolve("not.a.jwt"), None);
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer  abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
