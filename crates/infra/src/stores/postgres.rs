//! Postgres-backed stores.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | Any other | `Unavailable` |
//! | PoolClosed / Io / Tls / other | N/A | `Unavailable` |
//!
//! Row-not-found never reaches the mapper: lookups use `fetch_optional`.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{info, instrument};

use shopcart_auth::{Account, AccountStore, PasswordHash};
use shopcart_cart::{CartLine, CartStore};
use shopcart_catalog::{CatalogStore, CategoryFilter, Product};
use shopcart_core::{CartLineId, ProductId, StoreError, StoreResult, UserId};

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Open a connection pool.
pub async fn connect(database_url: &str) -> StoreResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Apply the schema. Idempotent.
pub async fn migrate(pool: &PgPool) -> StoreResult<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;
    info!("database schema applied");
    Ok(())
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                Some(code) if code.as_ref() == "23505" => StoreError::Duplicate(msg),
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::unavailable(format!("connection pool closed in {operation}"))
        }
        other => StoreError::unavailable(format!("sqlx error in {operation}: {other}")),
    }
}

fn corrupt(operation: &str, what: &str) -> StoreError {
    StoreError::unavailable(format!("{operation}: stored {what} out of range"))
}

fn to_i64(value: u64, operation: &str, what: &str) -> StoreResult<i64> {
    i64::try_from(value).map_err(|_| corrupt(operation, what))
}

fn product_from_row(row: &PgRow) -> StoreResult<Product> {
    let get = |e: sqlx::Error| map_sqlx_error("product_from_row", e);
    let price: i64 = row.try_get("price").map_err(get)?;
    let stock: i64 = row.try_get("stock").map_err(get)?;
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id").map_err(get)?),
        name: row.try_get("name").map_err(get)?,
        price: u64::try_from(price).map_err(|_| corrupt("product_from_row", "price"))?,
        category: row.try_get("category").map_err(get)?,
        description: row.try_get("description").map_err(get)?,
        image: row.try_get("image").map_err(get)?,
        stock: u32::try_from(stock).map_err(|_| corrupt("product_from_row", "stock"))?,
    })
}

fn line_from_row(row: &PgRow) -> StoreResult<CartLine> {
    let get = |e: sqlx::Error| map_sqlx_error("line_from_row", e);
    let qty: i64 = row.try_get("qty").map_err(get)?;
    let qty = u32::try_from(qty)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| corrupt("line_from_row", "qty"))?;
    Ok(CartLine {
        id: CartLineId::from_uuid(row.try_get("id").map_err(get)?),
        product_id: ProductId::from_uuid(row.try_get("product_id").map_err(get)?),
        qty,
    })
}

fn account_from_row(row: &PgRow) -> StoreResult<Account> {
    let get = |e: sqlx::Error| map_sqlx_error("account_from_row", e);
    Ok(Account {
        id: UserId::from_uuid(row.try_get("id").map_err(get)?),
        name: row.try_get("name").map_err(get)?,
        email: row.try_get("email").map_err(get)?,
        password_hash: PasswordHash::from_stored(
            row.try_get::<String, _>("password_hash").map_err(get)?,
        ),
    })
}

/// Postgres catalog (`products` table).
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip_all, fields(product_id = %product.id), err)]
    async fn create(&self, product: Product) -> StoreResult<Product> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, category, description, image, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(to_i64(product.price, "create_product", "price")?)
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.image)
        .bind(i64::from(product.stock))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;
        Ok(product)
    }

    #[instrument(skip(self), err)]
    async fn find(&self, filter: &CategoryFilter) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, category, description, image, stock
            FROM products
            WHERE $1::TEXT IS NULL OR category = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(filter.as_query())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_products", e))?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: ProductId) -> StoreResult<Product> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, category, description, image, stock
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product", e))?;

        match row {
            Some(row) => product_from_row(&row),
            None => Err(StoreError::not_found("product")),
        }
    }
}

/// Postgres cart (`cart_lines` table). `product_id` is unique.
#[derive(Debug, Clone)]
pub struct PostgresCartStore {
    pool: Arc<PgPool>,
}

impl PostgresCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl CartStore for PostgresCartStore {
    async fn find(&self) -> StoreResult<Vec<CartLine>> {
        let rows = sqlx::query("SELECT id, product_id, qty FROM cart_lines ORDER BY seq ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_lines", e))?;
        rows.iter().map(line_from_row).collect()
    }

    async fn find_by_product(&self, product_id: ProductId) -> StoreResult<Option<CartLine>> {
        let row = sqlx::query("SELECT id, product_id, qty FROM cart_lines WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_line_by_product", e))?;
        row.as_ref().map(line_from_row).transpose()
    }

    async fn find_by_id(&self, id: CartLineId) -> StoreResult<CartLine> {
        let row = sqlx::query("SELECT id, product_id, qty FROM cart_lines WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_line", e))?;
        match row {
            Some(row) => line_from_row(&row),
            None => Err(StoreError::not_found("cart line")),
        }
    }

    #[instrument(skip_all, fields(line_id = %line.id, product_id = %line.product_id), err)]
    async fn create(&self, line: CartLine) -> StoreResult<CartLine> {
        sqlx::query("INSERT INTO cart_lines (id, product_id, qty) VALUES ($1, $2, $3)")
            .bind(line.id.as_uuid())
            .bind(line.product_id.as_uuid())
            .bind(i64::from(line.quantity()))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_line", e))?;
        Ok(line)
    }

    #[instrument(skip(self), err)]
    async fn update(&self, id: CartLineId, qty: NonZeroU32) -> StoreResult<CartLine> {
        let row = sqlx::query(
            r#"
            UPDATE cart_lines SET qty = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, product_id, qty
            "#,
        )
        .bind(id.as_uuid())
        .bind(i64::from(qty.get()))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_line", e))?;
        match row {
            Some(row) => line_from_row(&row),
            None => Err(StoreError::not_found("cart line")),
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: CartLineId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_line", e))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Postgres accounts (`accounts` table). `email` is unique.
#[derive(Debug, Clone)]
pub struct PostgresAccountStore {
    pool: Arc<PgPool>,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    #[instrument(skip_all, fields(user_id = %account.id), err)]
    async fn create(&self, account: Account) -> StoreResult<Account> {
        sqlx::query(
            "INSERT INTO accounts (id, name, email, password_hash) VALUES ($1, $2, $3, $4)",
        )
        .bind(account.id.as_uuid())
        .bind(&account.name)
        .bind(&account.email)
        .bind(account.password_hash.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_account", e))?;
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query("SELECT id, name, email, password_hash FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_account", e))?;
        row.as_ref().map(account_from_row).transpose()
    }
}
