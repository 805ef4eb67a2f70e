use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopcart_core::UserId;

/// Session token claims.
///
/// `iat`/`exp` are Unix seconds so the encoded token stays a standard JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the account the token was issued to.
    pub sub: UserId,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(sub: UserId, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the token's time window against `now`.
///
/// Signature checks happen before this, in `Hs256Credentials`.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    let now = now.timestamp();
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_from(now: DateTime<Utc>, ttl: Duration) -> TokenClaims {
        TokenClaims::new(UserId::new(), now, now + ttl)
    }

    #[test]
    fn valid_inside_window() {
        let now = Utc::now();
        let claims = claims_from(now, Duration::hours(2));
        assert_eq!(validate_claims(&claims, now + Duration::minutes(5)), Ok(()));
    }

    #[test]
    fn expired_at_exact_expiry() {
        let now = Utc::now();
        let claims = claims_from(now, Duration::hours(2));
        assert_eq!(
            validate_claims(&claims, now + Duration::hours(2)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn not_yet_valid_before_issue() {
        let now = Utc::now();
        let claims = claims_from(now, Duration::hours(2));
        assert_eq!(
            validate_claims(&claims, now - Duration::minutes(1)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn empty_window_is_rejected() {
        let now = Utc::now();
        let claims = claims_from(now, Duration::zero());
        assert_eq!(
            validate_claims(&claims, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
