//! Catalog domain module.
//!
//! Product records, their validation rules, category filtering and the
//! `CatalogStore` port. No IO lives here; adapters are in `shopcart-infra`.

pub mod filter;
pub mod product;
pub mod store;

pub use filter::{ALL_CATEGORIES, CategoryFilter, categories};
pub use product::{NewProduct, Product};
pub use store::CatalogStore;
