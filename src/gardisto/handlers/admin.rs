use crate::gardisto::{authz::authorize, state::AppState};
use axum::{
    Json, extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Admin-only dashboard", content_type = "application/json"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an admin"),
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
// axum handler for the admin dashboard
#[instrument(skip(state, headers))]
pub async fn dashboard(state: Extension<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let context = match authorize(&headers, &state, &["admin"], None) {
        Ok(context) => context,
        Err(err) => return err.into_response(),
    };

    (
        StatusCode::OK,
        Json(json!({
            "dashboard": "ok",
            "admin": context.subject(),
        })),
    )
        .into_response()
}
