use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use shopcart_catalog::CategoryFilter;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListProductsQuery>,
) -> axum::response::Response {
    let filter = CategoryFilter::parse(query.category.as_deref());
    match services.cart.list_catalog(&filter).await {
        Ok(products) => Json(products).into_response(),
        Err(e) => errors::cart_error_to_response(e),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.cart.categories().await {
        Ok(categories) => Json(categories).into_response(),
        Err(e) => errors::cart_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };
    let new = match body.into_new_product() {
        Ok(n) => n,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    };

    match services.cart.add_product(new).await {
        Ok(product) => {
            (StatusCode::CREATED, Json(dto::ProductCreatedResponse { product })).into_response()
        }
        Err(e) => errors::cart_error_to_response(e),
    }
}
