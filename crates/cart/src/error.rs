use thiserror::Error;

use shopcart_core::{DomainError, StoreError};

/// Cart service failure.
///
/// Stock violations are never errors; they ride along on `CartOutcome`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The referenced product or cart line does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("validation failed: {0}")]
    Validation(String),

    /// A uniqueness constraint in a store was violated.
    #[error("duplicate {0}")]
    Duplicate(String),

    /// A store collaborator failed; not retried.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for CartError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Duplicate(what) => Self::Duplicate(what),
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
        }
    }
}

impl From<DomainError> for CartError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound(what) => Self::NotFound(what),
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
        }
    }
}
