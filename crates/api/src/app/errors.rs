use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, warn};

use shopcart_auth::AuthError;
use shopcart_cart::CartError;

pub fn cart_error_to_response(err: CartError) -> axum::response::Response {
    match err {
        CartError::NotFound(what) => json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found")),
        CartError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        CartError::Duplicate(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        CartError::StoreUnavailable(msg) => {
            error!("store unavailable: {msg}");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AuthError::Duplicate => json_error(StatusCode::CONFLICT, "conflict", "User already exists"),
        AuthError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "Invalid credentials")
        }
        AuthError::InvalidToken(_) | AuthError::TokenWindow(_) => {
            json_error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid or expired token")
        }
        AuthError::Credential(msg) => {
            error!("credential service failed: {msg}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "credential_error", "credential service failed")
        }
        AuthError::StoreUnavailable(msg) => {
            error!("store unavailable: {msg}");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
    }
}

/// Body parse failures become 400s in the usual error shape.
pub fn rejection_to_response(rejection: axum::extract::rejection::JsonRejection) -> axum::response::Response {
    warn!("rejected request body: {rejection}");
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_errors_map_to_statuses() {
        assert_eq!(
            cart_error_to_response(CartError::NotFound("product")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            cart_error_to_response(CartError::Validation("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            cart_error_to_response(CartError::Duplicate("x".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            cart_error_to_response(CartError::StoreUnavailable("down".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(auth_error_to_response(AuthError::Duplicate).status(), StatusCode::CONFLICT);
        assert_eq!(
            auth_error_to_response(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            auth_error_to_response(AuthError::InvalidToken("bad".into())).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
