//! Catalog store port.

use std::sync::Arc;

use async_trait::async_trait;

use shopcart_core::{ProductId, StoreResult};

use crate::{CategoryFilter, Product};

/// Product persistence boundary.
///
/// Implementations must return products in storage (insertion) order and
/// report a taken id as `StoreError::Duplicate`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create(&self, product: Product) -> StoreResult<Product>;

    async fn find(&self, filter: &CategoryFilter) -> StoreResult<Vec<Product>>;

    /// `StoreError::NotFound` when no product has this id.
    async fn find_by_id(&self, id: ProductId) -> StoreResult<Product>;
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn create(&self, product: Product) -> StoreResult<Product> {
        (**self).create(product).await
    }

    async fn find(&self, filter: &CategoryFilter) -> StoreResult<Vec<Product>> {
        (**self).find(filter).await
    }

    async fn find_by_id(&self, id: ProductId) -> StoreResult<Product> {
        (**self).find_by_id(id).await
    }
}
