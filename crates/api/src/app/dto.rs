use serde::{Deserialize, Serialize};

use shopcart_auth::Account;
use shopcart_cart::{CartLine, CartOutcome, LineChange, StockExceeded};
use shopcart_catalog::{NewProduct, Product};
use shopcart_core::{ProductId, UserId};

// -------------------------
// Request DTOs
// -------------------------

/// Product creation body. Fields are optional so a missing one is a 400
/// listing what is missing, not a body rejection.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub stock: Option<u32>,
}

impl CreateProductRequest {
    /// Missing text fields become empty and are reported by product
    /// validation; a missing price is reported here.
    pub fn into_new_product(self) -> Result<NewProduct, String> {
        let price = self.price.ok_or_else(|| "price is required".to_string())?;
        Ok(NewProduct {
            name: self.name.unwrap_or_default(),
            price,
            category: self.category.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            stock: self.stock.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    /// Increment; defaults to 1.
    pub qty: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub qty: i64,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -------------------------
// Response DTOs
// -------------------------

pub const ADDED_MESSAGE: &str = "Added to cart successfully!";
pub const INCREASED_MESSAGE: &str = "Quantity increased!";
pub const UPDATED_MESSAGE: &str = "Quantity updated";
pub const REMOVED_MESSAGE: &str = "Item removed from cart";

/// Body of every cart mutation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationResponse {
    /// `created`, `updated`, `unchanged` or `removed`.
    pub kind: &'static str,
    /// The line after the mutation; `null` once removed.
    pub line: Option<CartLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<CartLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_exceeded: Option<StockExceeded>,
    pub message: String,
}

impl From<CartOutcome> for CartMutationResponse {
    fn from(outcome: CartOutcome) -> Self {
        let kind = match outcome.change {
            LineChange::Created(_) => "created",
            LineChange::Updated(_) => "updated",
            LineChange::Unchanged(_) => "unchanged",
            LineChange::Removed(_) => "removed",
        };
        let message = match (&outcome.change, outcome.stock_exceeded) {
            (LineChange::Removed(_), _) => REMOVED_MESSAGE.to_string(),
            (_, Some(exceeded)) => exceeded.to_string(),
            (LineChange::Created(_), None) => ADDED_MESSAGE.to_string(),
            (LineChange::Updated(_), None) => UPDATED_MESSAGE.to_string(),
            (LineChange::Unchanged(_), None) => UPDATED_MESSAGE.to_string(),
        };
        Self {
            kind,
            line: outcome.line().cloned(),
            removed: outcome.removed().cloned(),
            stock_exceeded: outcome.stock_exceeded,
            message,
        }
    }
}

impl CartMutationResponse {
    /// An add that incremented an existing line says so.
    pub fn for_add(outcome: CartOutcome) -> Self {
        let increased = matches!(outcome.change, LineChange::Updated(_));
        let mut response = Self::from(outcome);
        if increased {
            response.message = INCREASED_MESSAGE.to_string();
        }
        response
    }
}

#[derive(Debug, Serialize)]
pub struct ProductCreatedResponse {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct CartTotalResponse {
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}
