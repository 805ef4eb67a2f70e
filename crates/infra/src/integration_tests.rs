//! Integration tests for the cart service over the in-memory stores.
//!
//! Tests: CartService → CatalogStore / CartStore
//!
//! Verifies:
//! - Adds stop at stock and report it
//! - Quantity changes clamp, and non-positive quantities remove
//! - Totals and listings follow the catalog as it is now
//! - Store outages surface as errors

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use shopcart_cart::{CartError, CartService, LineChange, StockExceeded};
    use shopcart_catalog::{CatalogStore, CategoryFilter, NewProduct, Product};
    use shopcart_core::{CartLineId, ProductId, StoreError, StoreResult};

    use crate::stores::{InMemoryCartStore, InMemoryCatalogStore};

    type Service = CartService<Arc<InMemoryCatalogStore>, Arc<InMemoryCartStore>>;

    fn product(name: &str, category: &str, price: u64, stock: u32) -> Product {
        Product {
            id: ProductId::new(),
            name: name.to_string(),
            price,
            category: category.to_string(),
            description: format!("{name} description"),
            image: format!("{name}.png"),
            stock,
        }
    }

    fn setup(products: Vec<Product>) -> (Service, Arc<InMemoryCatalogStore>) {
        let catalog = Arc::new(InMemoryCatalogStore::with_products(products));
        let cart = Arc::new(InMemoryCartStore::new());
        (CartService::new(catalog.clone(), cart), catalog)
    }

    #[tokio::test]
    async fn adds_stop_at_stock() {
        let p = product("boot", "Shoes", 1000, 3);
        let (svc, _) = setup(vec![p.clone()]);

        let first = svc.add(p.id, 1).await.unwrap();
        assert!(first.is_created());
        assert_eq!(first.line().unwrap().quantity(), 1);
        assert_eq!(first.stock_exceeded, None);

        assert_eq!(svc.add(p.id, 1).await.unwrap().line().unwrap().quantity(), 2);
        assert_eq!(svc.add(p.id, 1).await.unwrap().line().unwrap().quantity(), 3);

        let fourth = svc.add(p.id, 1).await.unwrap();
        assert!(matches!(fourth.change, LineChange::Unchanged(_)));
        assert_eq!(fourth.line().unwrap().quantity(), 3);
        assert_eq!(fourth.stock_exceeded, Some(StockExceeded { available: 3 }));

        let lines = svc.lines().await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity(), 3);
    }

    #[tokio::test]
    async fn increment_by_larger_delta() {
        let p = product("boot", "Shoes", 1000, 5);
        let (svc, _) = setup(vec![p.clone()]);

        svc.add(p.id, 1).await.unwrap();
        assert_eq!(svc.add(p.id, 3).await.unwrap().line().unwrap().quantity(), 4);

        let rejected = svc.add(p.id, 2).await.unwrap();
        assert_eq!(rejected.line().unwrap().quantity(), 4);
        assert_eq!(rejected.stock_exceeded, Some(StockExceeded { available: 5 }));
    }

    #[tokio::test]
    async fn first_add_of_out_of_stock_product_still_creates_a_line() {
        let p = product("ghost", "Shoes", 1000, 0);
        let (svc, _) = setup(vec![p.clone()]);

        let outcome = svc.add(p.id, 1).await.unwrap();
        assert!(outcome.is_created());
        assert_eq!(outcome.stock_exceeded, None);
    }

    #[tokio::test]
    async fn add_unknown_product_is_not_found() {
        let (svc, _) = setup(vec![]);
        assert_eq!(
            svc.add(ProductId::new(), 1).await.unwrap_err(),
            CartError::NotFound("product")
        );
    }

    #[tokio::test]
    async fn set_quantity_clamps_to_stock() {
        let p = product("boot", "Shoes", 1000, 3);
        let (svc, _) = setup(vec![p.clone()]);
        let line = svc.add(p.id, 1).await.unwrap().line().cloned().unwrap();

        let outcome = svc.set_quantity(line.id, 10).await.unwrap();
        assert_eq!(outcome.line().unwrap().quantity(), 3);
        assert_eq!(outcome.stock_exceeded, Some(StockExceeded { available: 3 }));

        let outcome = svc.set_quantity(line.id, 2).await.unwrap();
        assert_eq!(outcome.line().unwrap().quantity(), 2);
        assert_eq!(outcome.stock_exceeded, None);
    }

    #[tokio::test]
    async fn non_positive_quantity_removes_the_line() {
        let a = product("a", "Shoes", 100, 5);
        let b = product("b", "Shoes", 100, 5);
        let (svc, _) = setup(vec![a.clone(), b.clone()]);
        let la = svc.add(a.id, 1).await.unwrap().line().cloned().unwrap();
        let lb = svc.add(b.id, 1).await.unwrap().line().cloned().unwrap();

        let zero = svc.set_quantity(la.id, 0).await.unwrap();
        assert_eq!(zero.removed(), Some(&la));

        let negative = svc.set_quantity(lb.id, -3).await.unwrap();
        assert_eq!(negative.removed(), Some(&lb));

        assert!(svc.lines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_quantity_on_absent_line_is_not_found() {
        let (svc, _) = setup(vec![]);
        assert_eq!(
            svc.set_quantity(CartLineId::new(), 2).await.unwrap_err(),
            CartError::NotFound("cart line")
        );
    }

    #[tokio::test]
    async fn clamp_to_zero_stock_removes_and_reports() {
        let p = product("ghost", "Shoes", 100, 0);
        let (svc, _) = setup(vec![p.clone()]);
        let line = svc.add(p.id, 1).await.unwrap().line().cloned().unwrap();

        let outcome = svc.set_quantity(line.id, 2).await.unwrap();
        assert_eq!(outcome.removed(), Some(&line));
        assert_eq!(outcome.stock_exceeded, Some(StockExceeded { available: 0 }));
        assert!(svc.lines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn removing_absent_line_is_a_no_op() {
        let p = product("boot", "Shoes", 1000, 3);
        let (svc, _) = setup(vec![p.clone()]);
        svc.add(p.id, 1).await.unwrap();

        let outcome = svc.remove(CartLineId::new()).await.unwrap();
        assert_eq!(outcome.change, LineChange::Removed(None));
        assert_eq!(svc.lines().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn removing_twice_is_idempotent() {
        let p = product("boot", "Shoes", 1000, 3);
        let (svc, _) = setup(vec![p.clone()]);
        let line = svc.add(p.id, 1).await.unwrap().line().cloned().unwrap();

        assert_eq!(svc.remove(line.id).await.unwrap().removed(), Some(&line));
        assert_eq!(svc.remove(line.id).await.unwrap().removed(), None);
    }

    #[tokio::test]
    async fn total_sums_current_prices() {
        let a = product("a", "Shoes", 10, 5);
        let b = product("b", "Hats", 5, 5);
        let (svc, _) = setup(vec![a.clone(), b.clone()]);
        svc.add(a.id, 1).await.unwrap();
        svc.add(a.id, 1).await.unwrap();
        svc.add(b.id, 1).await.unwrap();

        let lines = svc.lines().await.unwrap();
        assert_eq!(svc.cart_total(&lines).await.unwrap(), 25);
        assert_eq!(svc.cart().await.unwrap().total, 25);
    }

    #[tokio::test]
    async fn empty_cart_totals_zero() {
        let (svc, _) = setup(vec![]);
        assert_eq!(svc.cart_total(&[]).await.unwrap(), 0);
        assert_eq!(svc.cart().await.unwrap().count(), 0);
    }

    #[tokio::test]
    async fn line_with_missing_product_counts_zero_and_is_hidden() {
        let a = product("a", "Shoes", 10, 5);
        let b = product("b", "Hats", 5, 5);
        let (svc, catalog) = setup(vec![a.clone(), b.clone()]);
        svc.add(a.id, 1).await.unwrap();
        svc.add(b.id, 1).await.unwrap();

        assert!(catalog.remove(b.id).unwrap());

        let lines = svc.lines().await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(svc.cart_total(&lines).await.unwrap(), 10);

        let view = svc.cart().await.unwrap();
        assert_eq!(view.count(), 1);
        assert_eq!(view.items[0].product_id, a.id);
        assert_eq!(view.total, 10);
    }

    #[tokio::test]
    async fn cart_view_joins_product_fields() {
        let a = product("a", "Shoes", 10, 5);
        let (svc, _) = setup(vec![a.clone()]);
        svc.add(a.id, 1).await.unwrap();
        svc.add(a.id, 1).await.unwrap();

        let item = &svc.cart().await.unwrap().items[0];
        assert_eq!(item.name, "a");
        assert_eq!(item.price, 10);
        assert_eq!(item.stock, 5);
        assert_eq!(item.qty, 2);
        assert_eq!(item.subtotal, 20);
    }

    #[tokio::test]
    async fn listing_filters_by_category_in_storage_order() {
        let a = product("a", "Shoes", 10, 5);
        let b = product("b", "Hats", 5, 5);
        let c = product("c", "Shoes", 7, 5);
        let (svc, _) = setup(vec![a.clone(), b.clone(), c.clone()]);

        let all = svc.list_catalog(&CategoryFilter::All).await.unwrap();
        assert_eq!(all, vec![a.clone(), b, c.clone()]);

        let none = svc.list_catalog(&CategoryFilter::parse(None)).await.unwrap();
        assert_eq!(none, all);

        let shoes = svc
            .list_catalog(&CategoryFilter::parse(Some("Shoes")))
            .await
            .unwrap();
        assert_eq!(shoes, vec![a, c]);

        let lower = svc
            .list_catalog(&CategoryFilter::parse(Some("shoes")))
            .await
            .unwrap();
        assert!(lower.is_empty());
    }

    #[tokio::test]
    async fn categories_start_with_all() {
        let (svc, _) = setup(vec![
            product("a", "Shoes", 10, 5),
            product("b", "Hats", 5, 5),
            product("c", "Shoes", 7, 5),
        ]);
        assert_eq!(svc.categories().await.unwrap(), vec!["All", "Shoes", "Hats"]);
    }

    #[tokio::test]
    async fn add_product_validates_and_lists() {
        let (svc, _) = setup(vec![]);
        let created = svc
            .add_product(NewProduct {
                name: " boot ".to_string(),
                price: 1999,
                category: "Shoes".to_string(),
                description: "leather".to_string(),
                image: "boot.png".to_string(),
                stock: 4,
            })
            .await
            .unwrap();
        assert_eq!(created.name, "boot");
        assert_eq!(svc.list_catalog(&CategoryFilter::All).await.unwrap(), vec![created]);

        let missing = svc
            .add_product(NewProduct {
                name: String::new(),
                price: 1,
                category: "Shoes".to_string(),
                description: "x".to_string(),
                image: "x.png".to_string(),
                stock: 1,
            })
            .await;
        assert!(matches!(missing, Err(CartError::Validation(_))));
    }

    #[tokio::test]
    async fn zero_delta_is_a_validation_error() {
        let p = product("boot", "Shoes", 1000, 3);
        let (svc, _) = setup(vec![p.clone()]);
        assert!(matches!(
            svc.add(p.id, 0).await,
            Err(CartError::Validation(_))
        ));
    }

    struct DownCatalog;

    #[async_trait]
    impl CatalogStore for DownCatalog {
        async fn create(&self, _product: Product) -> StoreResult<Product> {
            Err(StoreError::unavailable("connection refused"))
        }

        async fn find(&self, _filter: &CategoryFilter) -> StoreResult<Vec<Product>> {
            Err(StoreError::unavailable("connection refused"))
        }

        async fn find_by_id(&self, _id: ProductId) -> StoreResult<Product> {
            Err(StoreError::unavailable("connection refused"))
        }
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_unavailable() {
        let svc = CartService::new(DownCatalog, InMemoryCartStore::new());

        assert!(matches!(
            svc.add(ProductId::new(), 1).await,
            Err(CartError::StoreUnavailable(_))
        ));
        assert!(matches!(
            svc.list_catalog(&CategoryFilter::All).await,
            Err(CartError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn store_outage_fails_total_instead_of_counting_zero() {
        use shopcart_cart::{CartLine, CartStore};

        let cart = InMemoryCartStore::new();
        let line = cart.create(CartLine::first(ProductId::new())).await.unwrap();
        let svc = CartService::new(DownCatalog, cart);

        assert!(matches!(
            svc.cart_total(&[line]).await,
            Err(CartError::StoreUnavailable(_))
        ));
    }
}
