//! Shared cart store: one state container, changed only by `reduce`.

use tracing::debug;

use shopcart_cart::{CartItemView, CartLine, CartOutcome, CartView, LineChange, rules};
use shopcart_catalog::{CategoryFilter, Product};
use shopcart_core::{CartLineId, ProductId};

use crate::notices::{self, Notices};
use crate::snapshot::items_total;
use crate::{CartBackend, CartSnapshot, ClientError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub categories: Vec<String>,
    pub selected: CategoryFilter,
    pub products: Vec<Product>,
    pub items: Vec<CartItemView>,
    pub total: u64,
}

/// Every way the store's state can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    SetCategories(Vec<String>),
    SetProducts {
        selected: CategoryFilter,
        products: Vec<Product>,
    },
    /// Replace the cart wholesale (initial load, resync).
    SetCart(CartView),
    /// Absent → Present(1).
    LineCreated(CartItemView),
    /// Present(n) → Present(m).
    LineUpdated(CartLine),
    /// Present → Absent.
    LineRemoved(CartLineId),
}

/// Pure transition function.
///
/// `LineCreated` for an id already held replaces that item. `LineUpdated`
/// and `LineRemoved` for an unknown id leave the state as it is. `SetCart`
/// takes the backend's total; the line actions recompute it from the items.
pub fn reduce(state: StoreState, action: CartAction) -> StoreState {
    let mut next = state;
    match action {
        CartAction::SetCategories(categories) => next.categories = categories,
        CartAction::SetProducts { selected, products } => {
            next.selected = selected;
            next.products = products;
        }
        CartAction::SetCart(view) => {
            next.items = view.items;
            next.total = view.total;
        }
        CartAction::LineCreated(item) => {
            match next.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => *existing = item,
                None => next.items.push(item),
            }
            next.total = items_total(&next.items);
        }
        CartAction::LineUpdated(line) => {
            if let Some(item) = next.items.iter_mut().find(|i| i.id == line.id) {
                item.qty = line.quantity();
                item.subtotal = rules::line_subtotal(item.qty, item.price);
            }
            next.total = items_total(&next.items);
        }
        CartAction::LineRemoved(id) => {
            next.items.retain(|i| i.id != id);
            next.total = items_total(&next.items);
        }
    }
    next
}

/// Backend calls in, actions out.
pub struct SharedCartStore<B> {
    backend: B,
    state: StoreState,
    notices: Notices,
}

impl<B> SharedCartStore<B>
where
    B: CartBackend,
{
    pub fn new(backend: B) -> Self {
        Self::with_notices(backend, Notices::default())
    }

    pub fn with_notices(backend: B, notices: Notices) -> Self {
        Self {
            backend,
            state: StoreState::default(),
            notices,
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn dispatch(&mut self, action: CartAction) {
        debug!(?action, "dispatch");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let categories = self.backend.categories().await;
        let categories = self.report(categories)?;
        let selected = self.state.selected.clone();
        let products = self.backend.products(&selected).await;
        let products = self.report(products)?;
        let cart = self.backend.cart().await;
        let cart = self.report(cart)?;

        self.dispatch(CartAction::SetCategories(categories));
        self.dispatch(CartAction::SetProducts { selected, products });
        self.dispatch(CartAction::SetCart(cart));
        Ok(())
    }

    /// `"All"` (or empty) clears the filter.
    pub async fn select_category(&mut self, category: &str) -> Result<(), ClientError> {
        let selected = CategoryFilter::parse(Some(category));
        let products = self.backend.products(&selected).await;
        let products = self.report(products)?;
        self.dispatch(CartAction::SetProducts { selected, products });
        Ok(())
    }

    pub async fn add(&mut self, product_id: ProductId) -> Result<(), ClientError> {
        let outcome = self.backend.add(product_id).await;
        let outcome = self.report(outcome)?;
        if let Some(text) = notices::after_add(&outcome) {
            self.notices.show(text);
        }
        self.settle(&outcome).await
    }

    pub async fn set_quantity(&mut self, line_id: CartLineId, qty: i64) -> Result<(), ClientError> {
        let name = self.line_name(line_id);
        let outcome = self.backend.set_quantity(line_id, qty).await;
        let outcome = self.report(outcome)?;
        if let Some(text) = notices::after_update(&outcome, name.as_deref()) {
            self.notices.show(text);
        }
        self.settle(&outcome).await
    }

    pub async fn remove(&mut self, line_id: CartLineId) -> Result<(), ClientError> {
        let name = self.line_name(line_id);
        let outcome = self.backend.remove(line_id).await;
        let outcome = self.report(outcome)?;
        if let Some(text) = notices::after_update(&outcome, name.as_deref()) {
            self.notices.show(text);
        }
        self.settle(&outcome).await
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::build(
            &self.state.categories,
            &self.state.selected,
            &self.state.products,
            &self.state.items,
            self.state.total,
            self.notices.current(),
        )
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    fn line_name(&self, line_id: CartLineId) -> Option<String> {
        self.state
            .items
            .iter()
            .find(|i| i.id == line_id)
            .map(|i| i.name.clone())
    }

    fn report<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        result.inspect_err(|e| self.notices.show(e.notice()))
    }

    /// Translate an outcome into a line action, then resync the cart so
    /// prices and the total are the backend's.
    async fn settle(&mut self, outcome: &CartOutcome) -> Result<(), ClientError> {
        let action = match &outcome.change {
            LineChange::Created(line) => self
                .state
                .products
                .iter()
                .find(|p| p.id == line.product_id)
                .map(|product| CartAction::LineCreated(CartItemView::join(line, product))),
            LineChange::Updated(line) => Some(CartAction::LineUpdated(line.clone())),
            LineChange::Removed(Some(line)) => Some(CartAction::LineRemoved(line.id)),
            LineChange::Unchanged(_) | LineChange::Removed(None) => return Ok(()),
        };
        if let Some(action) = action {
            self.dispatch(action);
        }

        debug!("refetching cart after change");
        let cart = self.backend.cart().await;
        let cart = self.report(cart)?;
        self.dispatch(CartAction::SetCart(cart));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU32;

    use super::*;

    fn product(name: &str, price: u64) -> Product {
        Product {
            id: ProductId::new(),
            name: name.to_string(),
            price,
            category: "Shoes".to_string(),
            description: "d".to_string(),
            image: "i.png".to_string(),
            stock: 5,
        }
    }

    fn with_item(product: &Product) -> (StoreState, CartLine) {
        let line = CartLine::first(product.id);
        let state = reduce(
            StoreState::default(),
            CartAction::LineCreated(CartItemView::join(&line, product)),
        );
        (state, line)
    }

    #[test]
    fn line_created_appends_once() {
        let p = product("boot", 10);
        let (state, line) = with_item(&p);
        assert_eq!(state.items.len(), 1);

        let again = reduce(
            state,
            CartAction::LineCreated(CartItemView::join(&line, &p)),
        );
        assert_eq!(again.items.len(), 1);
    }

    #[test]
    fn line_updated_recomputes_subtotal() {
        let p = product("boot", 10);
        let (state, line) = with_item(&p);

        let state = reduce(
            state,
            CartAction::LineUpdated(line.with_qty(NonZeroU32::new(3).unwrap())),
        );
        assert_eq!(state.items[0].qty, 3);
        assert_eq!(state.items[0].subtotal, 30);
        assert_eq!(state.total, 30);
    }

    #[test]
    fn unknown_line_updates_are_ignored() {
        let p = product("boot", 10);
        let (state, _) = with_item(&p);
        let stray = CartLine::first(ProductId::new());

        let next = reduce(state.clone(), CartAction::LineUpdated(stray.clone()));
        assert_eq!(next, state);
        let next = reduce(next, CartAction::LineRemoved(stray.id));
        assert_eq!(next, state);
    }

    #[test]
    fn line_removed_drops_item() {
        let p = product("boot", 10);
        let (state, line) = with_item(&p);
        assert!(reduce(state, CartAction::LineRemoved(line.id)).items.is_empty());
    }

    #[test]
    fn set_cart_replaces_items() {
        let p = product("boot", 10);
        let (state, _) = with_item(&p);
        let state = reduce(state, CartAction::SetCart(CartView::default()));
        assert!(state.items.is_empty());
        assert_eq!(state.total, 0);
    }

    #[test]
    fn set_cart_takes_backend_total() {
        let p = product("boot", 10);
        let (state, line) = with_item(&p);
        let mut repriced = p.clone();
        repriced.price = 15;
        let item = CartItemView::join(&line, &repriced);

        let state = reduce(
            state,
            CartAction::SetCart(CartView {
                items: vec![item],
                total: 15,
            }),
        );
        assert_eq!(state.items[0].price, 15);
        assert_eq!(state.total, 15);
    }

    #[test]
    fn set_products_records_filter() {
        let p = product("boot", 10);
        let state = reduce(
            StoreState::default(),
            CartAction::SetProducts {
                selected: CategoryFilter::Category("Shoes".to_string()),
                products: vec![p.clone()],
            },
        );
        assert_eq!(state.selected, CategoryFilter::Category("Shoes".to_string()));
        assert_eq!(state.products, vec![p]);
    }
}
