//! In-memory stores for tests/dev.
//!
//! Records live in a `Vec` behind a `RwLock`, so listings come back in
//! insertion order. A poisoned lock surfaces as `StoreError::Unavailable`.

use std::num::NonZeroU32;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::instrument;

use shopcart_auth::{Account, AccountStore};
use shopcart_cart::{CartLine, CartStore};
use shopcart_catalog::{CatalogStore, CategoryFilter, Product};
use shopcart_core::{CartLineId, ProductId, StoreError, StoreResult, position};

fn read<T>(lock: &RwLock<T>) -> StoreResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| StoreError::unavailable("in-memory store lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> StoreResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| StoreError::unavailable("in-memory store lock poisoned"))
}

/// Catalog kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated catalog (dev seeding and tests).
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: RwLock::new(products.into_iter().collect()),
        }
    }

    /// Drop a product without touching cart lines that reference it.
    pub fn remove(&self, id: ProductId) -> StoreResult<bool> {
        let mut products = write(&self.products)?;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    #[instrument(skip_all, fields(product_id = %product.id))]
    async fn create(&self, product: Product) -> StoreResult<Product> {
        let mut products = write(&self.products)?;
        if position(&products, &product.id).is_some() {
            return Err(StoreError::duplicate(format!("product {}", product.id)));
        }
        products.push(product.clone());
        Ok(product)
    }

    async fn find(&self, filter: &CategoryFilter) -> StoreResult<Vec<Product>> {
        let products = read(&self.products)?;
        Ok(filter.apply(products.iter().cloned()).collect())
    }

    async fn find_by_id(&self, id: ProductId) -> StoreResult<Product> {
        let products = read(&self.products)?;
        position(&products, &id)
            .map(|i| products[i].clone())
            .ok_or(StoreError::not_found("product"))
    }
}

/// Cart lines kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    lines: RwLock<Vec<CartLine>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find(&self) -> StoreResult<Vec<CartLine>> {
        Ok(read(&self.lines)?.clone())
    }

    async fn find_by_product(&self, product_id: ProductId) -> StoreResult<Option<CartLine>> {
        Ok(read(&self.lines)?
            .iter()
            .find(|l| l.product_id == product_id)
            .cloned())
    }

    async fn find_by_id(&self, id: CartLineId) -> StoreResult<CartLine> {
        let lines = read(&self.lines)?;
        position(&lines, &id)
            .map(|i| lines[i].clone())
            .ok_or(StoreError::not_found("cart line"))
    }

    #[instrument(skip_all, fields(line_id = %line.id, product_id = %line.product_id))]
    async fn create(&self, line: CartLine) -> StoreResult<CartLine> {
        let mut lines = write(&self.lines)?;
        if lines.iter().any(|l| l.product_id == line.product_id) {
            return Err(StoreError::duplicate(format!(
                "cart line for product {}",
                line.product_id
            )));
        }
        if position(&lines, &line.id).is_some() {
            return Err(StoreError::duplicate(format!("cart line {}", line.id)));
        }
        lines.push(line.clone());
        Ok(line)
    }

    async fn update(&self, id: CartLineId, qty: NonZeroU32) -> StoreResult<CartLine> {
        let mut lines = write(&self.lines)?;
        let i = position(&lines, &id).ok_or(StoreError::not_found("cart line"))?;
        lines[i].qty = qty;
        Ok(lines[i].clone())
    }

    async fn delete(&self, id: CartLineId) -> StoreResult<bool> {
        let mut lines = write(&self.lines)?;
        let before = lines.len();
        lines.retain(|l| l.id != id);
        Ok(lines.len() != before)
    }
}

/// Accounts keyed by normalized email.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: Account) -> StoreResult<Account> {
        let mut accounts = write(&self.accounts)?;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::duplicate(format!("account {}", account.email)));
        }
        accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(read(&self.accounts)?
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopcart_auth::PasswordHash;
    use shopcart_core::UserId;

    fn product(name: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(),
            name: name.to_string(),
            price: 100,
            category: category.to_string(),
            description: "d".to_string(),
            image: "i.png".to_string(),
            stock: 5,
        }
    }

    #[tokio::test]
    async fn catalog_keeps_insertion_order_and_filters() {
        let store = InMemoryCatalogStore::new();
        let a = store.create(product("a", "Shoes")).await.unwrap();
        let b = store.create(product("b", "Hats")).await.unwrap();
        let c = store.create(product("c", "Shoes")).await.unwrap();

        let all = store.find(&CategoryFilter::All).await.unwrap();
        assert_eq!(all, vec![a.clone(), b, c.clone()]);

        let shoes = store
            .find(&CategoryFilter::Category("Shoes".to_string()))
            .await
            .unwrap();
        assert_eq!(shoes, vec![a, c]);
    }

    #[tokio::test]
    async fn catalog_rejects_duplicate_ids() {
        let store = InMemoryCatalogStore::new();
        let p = store.create(product("a", "Shoes")).await.unwrap();
        assert!(matches!(
            store.create(p).await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn removed_product_is_not_found() {
        let p = product("a", "Shoes");
        let store = InMemoryCatalogStore::with_products([p.clone()]);

        assert!(store.remove(p.id).unwrap());
        assert!(!store.remove(p.id).unwrap());
        assert_eq!(store.find_by_id(p.id).await, Err(StoreError::NotFound("product")));
    }

    #[tokio::test]
    async fn cart_allows_one_line_per_product() {
        let store = InMemoryCartStore::new();
        let product_id = ProductId::new();
        store.create(CartLine::first(product_id)).await.unwrap();

        assert!(matches!(
            store.create(CartLine::first(product_id)).await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn cart_update_and_delete() {
        let store = InMemoryCartStore::new();
        let line = store.create(CartLine::first(ProductId::new())).await.unwrap();

        let updated = store.update(line.id, NonZeroU32::new(4).unwrap()).await.unwrap();
        assert_eq!(updated.quantity(), 4);
        assert_eq!(store.find_by_id(line.id).await.unwrap().quantity(), 4);

        assert!(store.delete(line.id).await.unwrap());
        assert!(!store.delete(line.id).await.unwrap());
        assert!(store.find_by_id(line.id).await.unwrap_err().is_not_found());
        assert!(store
            .update(line.id, NonZeroU32::MIN)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn account_email_is_unique() {
        let store = InMemoryAccountStore::new();
        let account = Account {
            id: UserId::new(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: PasswordHash::from_stored("$argon2id$stub"),
        };
        store.create(account.clone()).await.unwrap();

        let again = Account {
            id: UserId::new(),
            ..account
        };
        assert!(matches!(
            store.create(again).await,
            Err(StoreError::Duplicate(_))
        ));
        assert!(store.find_by_email("ada@example.com").await.unwrap().is_some());
        assert!(store.find_by_email("bob@example.com").await.unwrap().is_none());
    }
}
