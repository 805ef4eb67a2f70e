//! Cart store port.

use core::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;

use shopcart_core::{CartLineId, ProductId, StoreResult};

use crate::CartLine;

/// Cart line persistence boundary.
///
/// A single-line update is assumed atomic at the storage layer. Nothing spans
/// two lines. At most one line may exist per product; `create` reports a
/// second one as `StoreError::Duplicate`.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// All lines in storage order.
    async fn find(&self) -> StoreResult<Vec<CartLine>>;

    async fn find_by_product(&self, product_id: ProductId) -> StoreResult<Option<CartLine>>;

    /// `StoreError::NotFound` when the line does not exist.
    async fn find_by_id(&self, id: CartLineId) -> StoreResult<CartLine>;

    async fn create(&self, line: CartLine) -> StoreResult<CartLine>;

    /// `StoreError::NotFound` when the line does not exist.
    async fn update(&self, id: CartLineId, qty: NonZeroU32) -> StoreResult<CartLine>;

    /// `true` when a line was deleted.
    async fn delete(&self, id: CartLineId) -> StoreResult<bool>;
}

#[async_trait]
impl<S> CartStore for Arc<S>
where
    S: CartStore + ?Sized,
{
    async fn find(&self) -> StoreResult<Vec<CartLine>> {
        (**self).find().await
    }

    async fn find_by_product(&self, product_id: ProductId) -> StoreResult<Option<CartLine>> {
        (**self).find_by_product(product_id).await
    }

    async fn find_by_id(&self, id: CartLineId) -> StoreResult<CartLine> {
        (**self).find_by_id(id).await
    }

    async fn create(&self, line: CartLine) -> StoreResult<CartLine> {
        (**self).create(line).await
    }

    async fn update(&self, id: CartLineId, qty: NonZeroU32) -> StoreResult<CartLine> {
        (**self).update(id, qty).await
    }

    async fn delete(&self, id: CartLineId) -> StoreResult<bool> {
        (**self).delete(id).await
    }
}
