use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::context::UserContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn me(Extension(user): Extension<UserContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "userId": user.user_id().to_string(),
    }))
}
