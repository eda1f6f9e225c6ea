use crate::gardisto::{authz::authorize, state::AppState};
use axum::{
    Json, extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Demo user directory", content_type = "application/json"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Role not allowed"),
    ),
    security(("bearer" = [])),
    tag = "api"
)]
// axum handler for users
#[instrument(skip(state, headers))]
pub async fn users(state: Extension<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    if let Err(err) = authorize(&headers, &state, &["user", "admin"], None) {
        return err.into_response();
    }

    (
        StatusCode::OK,
        Json(json!({
            "users": [
                {"username": "tom", "role": "user"},
                {"username": "jerry", "role": "user"},
            ]
        })),
    )
        .into_response()
}
