//! Bearer token service
//!
//! Issues and validates signed, time-bounded bearer tokens. The signing
//! secret and TTL are injected once at startup and never read from ambient
//! state.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Principal;
use crate::error::{AppError, AppResult};

/// Fixed issuer claim identifying this system.
const ISSUER: &str = "penny-api";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    /// Principal's email.
    sub: String,
    #[serde(rename = "userId")]
    user_id: String,
    iat: i64,
    exp: i64,
}

/// Identity recovered from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: Uuid,
    pub email: String,
}

/// Issues and validates HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_ms: i64,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_ms: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_ms,
        }
    }

    /// Issue a token for the given principal.
    ///
    /// Only fails on signer misconfiguration, which is fatal for the
    /// operation and not user-recoverable.
    pub fn issue(&self, principal: &Principal) -> AppResult<String> {
        if self.secret.is_empty() {
            return Err(AppError::Signing("signing secret is empty".to_string()));
        }

        let now = Utc::now();
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: principal.email.clone(),
            user_id: principal.id.to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + self.ttl_ms / 1000,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Signing(e.to_string()))
    }

    /// Validate a token and recover the embedded identity.
    ///
    /// Every failure mode - empty input, malformed structure, bad signature,
    /// foreign issuer, expiry, unparseable user id - collapses into `None`.
    /// Callers get no signal about why a token failed; keep it that way.
    pub fn validate(&self, token: &str) -> Option<VerifiedToken> {
        if token.is_empty() {
            return None;
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .ok()?;

        let user_id = Uuid::parse_str(&data.claims.user_id).ok()?;

        Some(VerifiedToken {
            user_id,
            email: data.claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-tokens-must-be-long-enough";
    const HOUR_MS: i64 = 3_600_000;

    fn principal() -> Principal {
        Principal::new(Uuid::new_v4(), "test@example.com", "Test User")
    }

    #[test]
    fn issued_token_has_three_segments() {
        let service = TokenService::new(SECRET, HOUR_MS);
        let token = service.issue(&principal()).unwrap();

        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn validate_round_trips_identity() {
        let service = TokenService::new(SECRET, HOUR_MS);
        let p = principal();

        let token = service.issue(&p).unwrap();
        let verified = service.validate(&token).unwrap();

        assert_eq!(verified.email, p.email);
        assert_eq!(verified.user_id, p.id);
    }

    #[test]
    fn empty_token_is_invalid() {
        let service = TokenService::new(SECRET, HOUR_MS);
        assert_eq!(service.validate(""), None);
    }

    #[test]
    fn malformed_token_is_invalid() {
        let service = TokenService::new(SECRET, HOUR_MS);
        assert_eq!(service.validate("invalid.token.here"), None);
    }

    #[test]
    fn foreign_secret_is_invalid() {
        let service = TokenService::new(SECRET, HOUR_MS);
        let other = TokenService::new("a-completely-different-signing-secret", HOUR_MS);

        let token = other.issue(&principal()).unwrap();

        assert_eq!(service.validate(&token), None);
    }

    #[test]
    fn foreign_issuer_is_invalid() {
        let service = TokenService::new(SECRET, HOUR_MS);
        let p = principal();

        let now = Utc::now();
        let claims = Claims {
            iss: "wrong-issuer".to_string(),
            sub: p.email.clone(),
            user_id: p.id.to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(service.validate(&token), None);
    }

    #[test]
    fn expired_token_is_invalid() {
        let expired_issuer = TokenService::new(SECRET, -10_000);
        let service = TokenService::new(SECRET, HOUR_MS);

        let token = expired_issuer.issue(&principal()).unwrap();

        assert_eq!(service.validate(&token), None);
    }

    #[test]
    fn garbage_user_id_claim_is_invalid() {
        let service = TokenService::new(SECRET, HOUR_MS);

        let now = Utc::now();
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: "test@example.com".to_string(),
            user_id: "not-a-uuid".to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(service.validate(&token), None);
    }

    #[test]
    fn empty_secret_fails_signing() {
        let service = TokenService::new("", HOUR_MS);
        let err = service.issue(&principal()).unwrap_err();

        assert!(matches!(err, AppError::Signing(_)));
    }
}
