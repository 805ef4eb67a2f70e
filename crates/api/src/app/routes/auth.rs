use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use shopcart_auth::NewAccount;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    let new = NewAccount {
        name: body.name,
        email: body.email,
        password: body.password,
    };
    match services.accounts.register(new).await {
        Ok(account) => (StatusCode::CREATED, Json(dto::AccountResponse::from(account))).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match services.accounts.login(&body.email, &body.password).await {
        Ok(issued) => Json(serde_json::json!({
            "token": issued.token,
            "expiresAt": issued.expires_at,
        }))
        .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
