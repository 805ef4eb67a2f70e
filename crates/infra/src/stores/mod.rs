//! Store adapters for the catalog, cart and account ports.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::{InMemoryAccountStore, InMemoryCartStore, InMemoryCatalogStore};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresAccountStore, PostgresCartStore, PostgresCatalogStore};
