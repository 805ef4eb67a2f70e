//! Domain and store error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type returned by store adapters (catalog, cart, accounts).
pub type StoreResult<T> = Result<T, StoreError>;

/// Domain-level error.
///
/// Deterministic, business failures only (validation, missing references).
/// Storage failures are `StoreError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced product or cart line does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound(what)
    }
}

/// Error surfaced by a store collaborator.
///
/// Adapters never retry; callers see `Unavailable` as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated (e.g. an email already registered).
    #[error("duplicate {0}")]
    Duplicate(String),

    /// The backing store could not be reached or failed mid-operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound(what)
    }

    pub fn duplicate(what: impl Into<String>) -> Self {
        Self::Duplicate(what.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
