use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use shopcart_core::CartLineId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_cart).post(add_to_cart))
        .route("/total", get(get_total))
        .route("/:id", axum::routing::put(set_quantity).delete(remove_line))
}

pub async fn get_cart(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.cart.cart().await {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::cart_error_to_response(e),
    }
}

pub async fn get_total(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let lines = match services.cart.lines().await {
        Ok(l) => l,
        Err(e) => return errors::cart_error_to_response(e),
    };
    match services.cart.cart_total(&lines).await {
        Ok(total) => Json(dto::CartTotalResponse { total }).into_response(),
        Err(e) => errors::cart_error_to_response(e),
    }
}

pub async fn add_to_cart(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::AddToCartRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match services.cart.add(body.product_id, body.qty.unwrap_or(1)).await {
        Ok(outcome) => {
            let status = if outcome.is_created() {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(dto::CartMutationResponse::for_add(outcome))).into_response()
        }
        Err(e) => errors::cart_error_to_response(e),
    }
}

pub async fn set_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::SetQuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let line_id = match parse_line_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match services.cart.set_quantity(line_id, body.qty).await {
        Ok(outcome) => Json(dto::CartMutationResponse::from(outcome)).into_response(),
        Err(e) => errors::cart_error_to_response(e),
    }
}

/// Always 200: removing an absent line is not an error.
pub async fn remove_line(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let line_id = match parse_line_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.cart.remove(line_id).await {
        Ok(outcome) => Json(dto::CartMutationResponse::from(outcome)).into_response(),
        Err(e) => errors::cart_error_to_response(e),
    }
}

fn parse_line_id(raw: &str) -> Result<CartLineId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid cart line id"))
}
