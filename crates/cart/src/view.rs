//! Read-side shapes: lines joined with their current product.

use serde::{Deserialize, Serialize};

use shopcart_catalog::Product;
use shopcart_core::{CartLineId, ProductId};

use crate::{CartLine, rules};

/// One cart line with the product fields a cart listing shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    pub image: String,
    pub stock: u32,
    pub qty: u32,
    pub subtotal: u64,
}

impl CartItemView {
    pub fn join(line: &CartLine, product: &Product) -> Self {
        Self {
            id: line.id,
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            stock: product.stock,
            qty: line.quantity(),
            subtotal: rules::line_subtotal(line.quantity(), product.price),
        }
    }
}

/// The whole cart as displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: u64,
}

impl CartView {
    /// Number of distinct lines (the cart badge count).
    pub fn count(&self) -> usize {
        self.items.len()
    }
}
