use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod cart;
pub mod products;
pub mod system;

/// Routes anyone may call.
pub fn public_router() -> Router {
    Router::new()
        .route("/api/products", get(products::list_products))
        .route("/api/products/categories", get(products::list_categories))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
}

/// Catalog writes and the cart; guarded when auth is required.
pub fn shop_router() -> Router {
    Router::new()
        .route("/api/products", post(products::create_product))
        .nest("/api/cart", cart::router())
}
