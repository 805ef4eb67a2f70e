//! Cart Service: the cart-mutation contract executed against the stores.

use tracing::{debug, info, instrument, warn};

use shopcart_catalog::{CatalogStore, CategoryFilter, NewProduct, Product, categories};
use shopcart_core::{CartLineId, ProductId, StoreError};

use crate::rules::{self, AddDecision, SetDecision};
use crate::{CartError, CartItemView, CartLine, CartOutcome, CartStore, CartView, LineChange};

/// Mediates between the catalog and the cart; owns neither.
///
/// Every operation is one request against the stores. No locking happens
/// here and nothing is retried.
#[derive(Debug, Clone)]
pub struct CartService<C, K> {
    catalog: C,
    cart: K,
}

impl<C, K> CartService<C, K>
where
    C: CatalogStore,
    K: CartStore,
{
    pub fn new(catalog: C, cart: K) -> Self {
        Self { catalog, cart }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn cart_store(&self) -> &K {
        &self.cart
    }

    /// Add a product, or increment its existing line by `delta`.
    #[instrument(skip_all, fields(%product_id, delta))]
    pub async fn add(&self, product_id: ProductId, delta: u32) -> Result<CartOutcome, CartError> {
        let product = self.product(product_id).await?;
        let existing = self.cart.find_by_product(product_id).await?;

        match rules::decide_add(existing.as_ref(), product.stock, delta)? {
            AddDecision::Create => {
                let line = self.cart.create(CartLine::first(product_id)).await?;
                info!(line_id = %line.id, "cart line created");
                Ok(CartOutcome::new(LineChange::Created(line)))
            }
            AddDecision::Increment(qty) => {
                // `existing` is Some on this branch.
                let id = existing.map(|l| l.id).ok_or(CartError::NotFound("cart line"))?;
                let line = self.cart.update(id, qty).await?;
                info!(line_id = %line.id, qty = line.quantity(), "cart line incremented");
                Ok(CartOutcome::new(LineChange::Updated(line)))
            }
            AddDecision::Reject(exceeded) => {
                let line = existing.ok_or(CartError::NotFound("cart line"))?;
                warn!(line_id = %line.id, available = exceeded.available, "increment rejected: stock exceeded");
                Ok(CartOutcome::with_stock_exceeded(LineChange::Unchanged(line), exceeded))
            }
        }
    }

    /// Set a line's quantity; `qty <= 0` removes it, `qty > stock` clamps.
    #[instrument(skip_all, fields(%line_id))]
    pub async fn set_quantity(&self, line_id: CartLineId, qty: i64) -> Result<CartOutcome, CartError> {
        if qty <= 0 {
            return self.remove(line_id).await;
        }

        let line = self.cart.find_by_id(line_id).await?;
        let product = self.product(line.product_id).await?;

        match rules::decide_set_quantity(qty, product.stock) {
            SetDecision::Remove => self.remove(line_id).await,
            SetDecision::Set(q) => {
                let line = self.cart.update(line_id, q).await?;
                info!(qty = line.quantity(), "cart line quantity set");
                Ok(CartOutcome::new(LineChange::Updated(line)))
            }
            SetDecision::Clamp(q, exceeded) => {
                let line = self.cart.update(line_id, q).await?;
                warn!(requested = qty, available = exceeded.available, "quantity clamped to stock");
                Ok(CartOutcome::with_stock_exceeded(LineChange::Updated(line), exceeded))
            }
            SetDecision::ClampToRemove(exceeded) => {
                warn!(requested = qty, "product out of stock; removing line");
                let mut outcome = self.remove(line_id).await?;
                outcome.stock_exceeded = Some(exceeded);
                Ok(outcome)
            }
        }
    }

    /// Delete a line. Absent lines are a no-op, not an error.
    #[instrument(skip_all, fields(%line_id))]
    pub async fn remove(&self, line_id: CartLineId) -> Result<CartOutcome, CartError> {
        let line = match self.cart.find_by_id(line_id).await {
            Ok(line) => line,
            Err(StoreError::NotFound(_)) => {
                debug!("remove of absent line ignored");
                return Ok(CartOutcome::new(LineChange::Removed(None)));
            }
            Err(e) => return Err(e.into()),
        };

        let removed = if self.cart.delete(line_id).await? {
            info!("cart line removed");
            Some(line)
        } else {
            None
        };
        Ok(CartOutcome::new(LineChange::Removed(removed)))
    }

    /// Products in storage order, optionally narrowed to one category.
    pub async fn list_catalog(&self, filter: &CategoryFilter) -> Result<Vec<Product>, CartError> {
        let products = self.catalog.find(filter).await?;
        debug!(count = products.len(), ?filter, "catalog listed");
        Ok(products)
    }

    /// `"All"` plus every distinct category.
    pub async fn categories(&self) -> Result<Vec<String>, CartError> {
        let products = self.catalog.find(&CategoryFilter::All).await?;
        Ok(categories(&products))
    }

    /// Catalog-add.
    #[instrument(skip_all, fields(name = %new.name))]
    pub async fn add_product(&self, new: NewProduct) -> Result<Product, CartError> {
        let product = Product::from_new(ProductId::new(), new)?;
        let product = self.catalog.create(product).await?;
        info!(product_id = %product.id, "product added to catalog");
        Ok(product)
    }

    pub async fn lines(&self) -> Result<Vec<CartLine>, CartError> {
        Ok(self.cart.find().await?)
    }

    /// Σ qty × current price. Lines whose product no longer resolves count
    /// as zero; store outages still fail.
    pub async fn cart_total(&self, lines: &[CartLine]) -> Result<u64, CartError> {
        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let price = self.resolve(line).await?.map(|p| p.price);
            priced.push((line.quantity(), price));
        }
        Ok(rules::total(priced))
    }

    /// Every line joined with its current product, plus the total.
    pub async fn cart(&self) -> Result<CartView, CartError> {
        let lines = self.cart.find().await?;
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            if let Some(product) = self.resolve(line).await? {
                items.push(CartItemView::join(line, &product));
            }
        }
        let total = rules::total(items.iter().map(|i| (i.qty, Some(i.price))));
        Ok(CartView { items, total })
    }

    async fn product(&self, id: ProductId) -> Result<Product, CartError> {
        self.catalog.find_by_id(id).await.map_err(|e| match e {
            StoreError::NotFound(_) => CartError::NotFound("product"),
            other => other.into(),
        })
    }

    /// The line's product, or `None` (logged) if it is gone.
    async fn resolve(&self, line: &CartLine) -> Result<Option<Product>, CartError> {
        match self.catalog.find_by_id(line.product_id).await {
            Ok(p) => Ok(Some(p)),
            Err(StoreError::NotFound(_)) => {
                warn!(line_id = %line.id, product_id = %line.product_id, "cart line references a missing product");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
