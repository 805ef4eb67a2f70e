//! Component-local cart state.

use tracing::debug;

use shopcart_cart::{CartItemView, CartOutcome, LineChange, rules};
use shopcart_catalog::{CategoryFilter, Product};
use shopcart_core::{CartLineId, ProductId};

use crate::notices::{self, Notices};
use crate::snapshot::items_total;
use crate::{CartBackend, CartSnapshot, ClientError};

/// Holds its own copy of the catalog page and cart, and patches the cart in
/// place from each mutation's outcome. After any change the cart is
/// refetched, so prices and the total are the backend's.
pub struct LocalCartView<B> {
    backend: B,
    categories: Vec<String>,
    selected: CategoryFilter,
    products: Vec<Product>,
    items: Vec<CartItemView>,
    total: u64,
    notices: Notices,
}

impl<B> LocalCartView<B>
where
    B: CartBackend,
{
    pub fn new(backend: B) -> Self {
        Self::with_notices(backend, Notices::default())
    }

    pub fn with_notices(backend: B, notices: Notices) -> Self {
        Self {
            backend,
            categories: Vec::new(),
            selected: CategoryFilter::All,
            products: Vec::new(),
            items: Vec::new(),
            total: 0,
            notices,
        }
    }

    /// Initial fetch: categories, products for the current filter, cart.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let loaded = async {
            let categories = self.backend.categories().await?;
            let products = self.backend.products(&self.selected).await?;
            let cart = self.backend.cart().await?;
            Ok::<_, ClientError>((categories, products, cart))
        }
        .await;

        let (categories, products, cart) = self.report(loaded)?;
        self.categories = categories;
        self.products = products;
        self.items = cart.items;
        self.total = cart.total;
        Ok(())
    }

    /// `"All"` (or empty) clears the filter.
    pub async fn select_category(&mut self, category: &str) -> Result<(), ClientError> {
        let filter = CategoryFilter::parse(Some(category));
        let products = self.backend.products(&filter).await;
        self.products = self.report(products)?;
        self.selected = filter;
        Ok(())
    }

    pub async fn add(&mut self, product_id: ProductId) -> Result<(), ClientError> {
        let outcome = self.backend.add(product_id).await;
        let outcome = self.report(outcome)?;
        if let Some(text) = notices::after_add(&outcome) {
            self.notices.show(text);
        }
        self.apply(&outcome).await
    }

    pub async fn set_quantity(&mut self, line_id: CartLineId, qty: i64) -> Result<(), ClientError> {
        let name = self.line_name(line_id);
        let outcome = self.backend.set_quantity(line_id, qty).await;
        let outcome = self.report(outcome)?;
        if let Some(text) = notices::after_update(&outcome, name.as_deref()) {
            self.notices.show(text);
        }
        self.apply(&outcome).await
    }

    pub async fn remove(&mut self, line_id: CartLineId) -> Result<(), ClientError> {
        let name = self.line_name(line_id);
        let outcome = self.backend.remove(line_id).await;
        let outcome = self.report(outcome)?;
        if let Some(text) = notices::after_update(&outcome, name.as_deref()) {
            self.notices.show(text);
        }
        self.apply(&outcome).await
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::build(
            &self.categories,
            &self.selected,
            &self.products,
            &self.items,
            self.total,
            self.notices.current(),
        )
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    fn line_name(&self, line_id: CartLineId) -> Option<String> {
        self.items
            .iter()
            .find(|i| i.id == line_id)
            .map(|i| i.name.clone())
    }

    /// Show the failure as a notice and hand it back.
    fn report<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        result.inspect_err(|e| self.notices.show(e.notice()))
    }

    async fn apply(&mut self, outcome: &CartOutcome) -> Result<(), ClientError> {
        match &outcome.change {
            LineChange::Created(line) => {
                if let Some(product) = self.products.iter().find(|p| p.id == line.product_id) {
                    self.items.push(CartItemView::join(line, product));
                }
            }
            LineChange::Updated(line) => {
                if let Some(item) = self.items.iter_mut().find(|i| i.id == line.id) {
                    item.qty = line.quantity();
                    item.subtotal = rules::line_subtotal(item.qty, item.price);
                }
            }
            LineChange::Removed(Some(line)) => self.items.retain(|i| i.id != line.id),
            LineChange::Unchanged(_) | LineChange::Removed(None) => return Ok(()),
        }
        self.total = items_total(&self.items);

        debug!("refetching cart after change");
        let cart = self.backend.cart().await;
        let cart = self.report(cart)?;
        self.items = cart.items;
        self.total = cart.total;
        Ok(())
    }
}
