use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shopcart_auth::CredentialService;

use crate::app::errors::json_error;
use crate::context::UserContext;

#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<dyn CredentialService>,
    /// Reject requests without a bearer token. When false, a missing token
    /// passes through anonymously but a bad one is still rejected.
    pub required: bool,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    match extract_bearer(req.headers())? {
        Some(token) => {
            let user_id = state.credentials.verify_token(token).map_err(|e| {
                debug!("bearer token rejected: {e}");
                unauthorized("invalid or expired token")
            })?;
            req.extensions_mut().insert(UserContext::new(user_id));
        }
        None if state.required => return Err(unauthorized("missing bearer token")),
        None => {}
    }

    Ok(next.run(req).await)
}

fn unauthorized(message: &'static str) -> Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

/// `Ok(None)` when no Authorization header was sent.
fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, Response> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header
        .to_str()
        .map_err(|_| unauthorized("malformed authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("expected a bearer token"))?
        .trim();
    if token.is_empty() {
        return Err(unauthorized("empty bearer token"));
    }

    Ok(Some(token))
}
