//! Router assembly.

use std::sync::Arc;

use axum::{Router, extract::Extension, routing::get};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware::{AuthState, auth_middleware};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the HTTP app over already-constructed services.
pub fn build_app(config: &AppConfig, services: Arc<AppServices>) -> Router {
    let credentials = services.credentials().clone();

    let me = Router::new()
        .route("/api/me", get(routes::system::me))
        .layer(axum::middleware::from_fn_with_state(
            AuthState {
                credentials: credentials.clone(),
                required: true,
            },
            auth_middleware,
        ));

    let shop = routes::shop_router().layer(axum::middleware::from_fn_with_state(
        AuthState {
            credentials,
            required: config.require_auth,
        },
        auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(shop)
        .merge(me)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}

/// In-memory app for dev and tests.
pub fn build_in_memory_app(config: &AppConfig) -> Router {
    build_app(config, Arc::new(AppServices::in_memory(config)))
}
