use serde::Serialize;

use shopcart_cart::{CartItemView, rules};
use shopcart_catalog::{ALL_CATEGORIES, CategoryFilter, Product};

/// What a storefront shows. Both state styles produce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub categories: Vec<String>,
    pub selected_category: String,
    /// Products matching the selected category, in catalog order.
    pub products: Vec<Product>,
    pub items: Vec<CartItemView>,
    /// Cart badge: number of distinct lines.
    pub count: usize,
    pub total: u64,
    pub notice: Option<String>,
}

impl CartSnapshot {
    pub fn build(
        categories: &[String],
        selected: &CategoryFilter,
        products: &[Product],
        items: &[CartItemView],
        total: u64,
        notice: Option<String>,
    ) -> Self {
        Self {
            categories: categories.to_vec(),
            selected_category: selected.as_query().unwrap_or(ALL_CATEGORIES).to_string(),
            products: products.to_vec(),
            items: items.to_vec(),
            count: items.len(),
            total,
            notice,
        }
    }
}

/// Sum of the held items; a stand-in until the backend's total arrives.
pub(crate) fn items_total(items: &[CartItemView]) -> u64 {
    rules::total(items.iter().map(|i| (i.qty, Some(i.price))))
}
