use crate::gardisto::{authz::authorize, state::AppState};
use axum::{
    Json, extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Verified identity of the caller", content_type = "application/json"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing the profile:read permission"),
    ),
    security(("bearer" = [])),
    tag = "api"
)]
// axum handler for me
#[instrument(skip(state, headers))]
pub async fn me(state: Extension<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let context = match authorize(&headers, &state, &["user", "admin"], Some("profile:read")) {
        Ok(context) => context,
        Err(err) => return err.into_response(),
    };

    (
        StatusCode::OK,
        Json(json!({
            "subject": context.subject(),
            "role": context.role(),
            "permissions": context.permissions(),
        })),
    )
        .into_response()
}
