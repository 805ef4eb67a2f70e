//! `shopcart-auth`: credential service and account registration/login.
//!
//! Decoupled from HTTP: the API crate turns these into routes and middleware.

pub mod account;
pub mod claims;
pub mod credentials;
pub mod error;

pub use account::{Account, AccountService, AccountStore, NewAccount};
pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use credentials::{CredentialService, Hs256Credentials, IssuedToken, PasswordHash};
pub use error::AuthError;
