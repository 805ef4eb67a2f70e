use thiserror::Error;

use shopcart_core::StoreError;

use crate::TokenValidationError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),

    /// An account with this email already exists.
    #[error("user already exists")]
    Duplicate,

    /// Unknown email or wrong password (deliberately indistinguishable).
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token rejected: {0}")]
    TokenWindow(#[from] TokenValidationError),

    #[error("credential backend failure: {0}")]
    Credential(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate(_) => Self::Duplicate,
            StoreError::NotFound(_) => Self::InvalidCredentials,
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
        }
    }
}
