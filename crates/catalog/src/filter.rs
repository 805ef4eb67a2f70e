//! Category filtering for catalog listings.

use serde::{Deserialize, Serialize};

use crate::Product;

/// Sentinel category meaning "no filter".
pub const ALL_CATEGORIES: &str = "All";

/// Category filter for `listCatalog`.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse an optional query value; absent, empty or `"All"` means no filter.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Self::All,
            Some(s) if s.is_empty() || s == ALL_CATEGORIES => Self::All,
            Some(s) => Self::Category(s.to_string()),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(c) => product.category == *c,
        }
    }

    /// Keep matching products, preserving input order.
    pub fn apply<'a, I>(&'a self, products: I) -> impl Iterator<Item = Product> + 'a
    where
        I: IntoIterator<Item = Product>,
        I::IntoIter: 'a,
    {
        products.into_iter().filter(move |p| self.matches(p))
    }

    pub fn as_query(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Category(c) => Some(c.as_str()),
        }
    }
}

/// `"All"` followed by each distinct category in first-seen order.
pub fn categories<'a, I>(products: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for p in products {
        if !out.iter().any(|c| *c == p.category) {
            out.push(p.category.clone());
        }
    }
    out
}
