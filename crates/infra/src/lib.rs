//! Infrastructure layer: store adapters (in-memory and Postgres).

pub mod stores;

pub use stores::{InMemoryAccountStore, InMemoryCartStore, InMemoryCatalogStore};
#[cfg(feature = "postgres")]
pub use stores::{PostgresAccountStore, PostgresCartStore, PostgresCatalogStore};

#[cfg(test)]
mod integration_tests;
