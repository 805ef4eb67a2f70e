//! `shopcart-core`: shared building blocks for the shopping-cart crates.
//!
//! Typed identifiers, the domain/store error model and the `Entity` trait.
//! Nothing here performs IO.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, position};
pub use error::{DomainError, DomainResult, StoreError, StoreResult};
pub use id::{CartLineId, ProductId, UserId};
