//! Credential service: password hashing and session tokens.

use argon2::password_hash::{PasswordHash as PhcString, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use shopcart_core::UserId;

use crate::{AuthError, TokenClaims, validate_claims};

/// Opaque password hash (PHC string). Never the plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// A signed session token and when it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Credential collaborator contract.
pub trait CredentialService: Send + Sync {
    fn hash(&self, password: &str) -> Result<PasswordHash, AuthError>;

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;

    /// Issue a time-bounded token for `subject`.
    fn issue_token(&self, subject: UserId) -> Result<IssuedToken, AuthError>;

    fn verify_token(&self, token: &str) -> Result<UserId, AuthError>;
}

/// Argon2id password hashes + HS256-signed JWTs.
pub struct Hs256Credentials {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    hasher: Argon2<'static>,
}

impl Hs256Credentials {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            hasher: Argon2::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue_token_at(&self, subject: UserId, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Credential(format!("token ttl {} out of range", self.ttl)))?;
        let claims = TokenClaims::new(subject, now, expires_at);
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Credential(format!("token encoding failed: {e}")))?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AuthError> {
        // Expiry is checked by `validate_claims` against the caller's clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims.sub)
    }
}

impl CredentialService for Hs256Credentials {
    fn hash(&self, password: &str) -> Result<PasswordHash, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Credential(format!("password hashing failed: {e}")))?;
        Ok(PasswordHash(phc.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        match PhcString::new(hash.as_str()) {
            Ok(parsed) => self.hasher.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                tracing::warn!("stored password hash is malformed: {e}");
                false
            }
        }
    }

    fn issue_token(&self, subject: UserId) -> Result<IssuedToken, AuthError> {
        self.issue_token_at(subject, Utc::now())
    }

    fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        self.verify_token_at(token, Utc::now())
    }
}
