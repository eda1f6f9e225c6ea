use crate::gardisto::{
    authz::authorize,
    error::AuthError,
    handlers::valid_password,
    password,
    state::AppState,
};
use axum::{
    Json, extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[utoipa::path(
    put,
    path = "/api/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", content_type = "application/json"),
        (status = 400, description = "Missing payload or weak new password"),
        (status = 401, description = "Not authenticated or wrong current password"),
    ),
    security(("bearer" = [])),
    tag = "api"
)]
// axum handler for password change
#[instrument(skip(state, headers, payload))]
pub async fn change_password(
    state: Extension<Arc<AppState>>,
    headers: HeaderMap,
    payload: Option<Json<ChangePasswordRequest>>,
) -> impl IntoResponse {
    let context = match authorize(&headers, &state, &["user", "admin"], None) {
        Ok(context) => context,
        Err(err) => return err.into_response(),
    };
    let Some(subject) = context.subject() else {
        return AuthError::TokenInvalid.into_response();
    };

    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing payload"})),
        )
            .into_response();
    };

    let Some(user) = state.store().find_by_username(subject) else {
        // A valid token for a user the store no longer knows.
        return AuthError::InvalidCredentials.into_response();
    };

    let current = request.current_password;
    let stored_hash = user.password_hash.clone();
    let verified =
        match tokio::task::spawn_blocking(move || password::verify(&current, &stored_hash)).await {
            Ok(verified) => verified,
            Err(err) => {
                error!("Verification task failed: {err}");
                return AuthError::Internal.into_response();
            }
        };
    if !verified {
        return AuthError::InvalidCredentials.into_response();
    }

    if !valid_password(&request.new_password) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "password does not meet the strength policy"})),
        )
            .into_response();
    }

    let new_password = request.new_password;
    let hash = match tokio::task::spawn_blocking(move || password::hash(&new_password)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(err)) => return err.into_response(),
        Err(err) => {
            error!("Hashing task failed: {err}");
            return AuthError::Internal.into_response();
        }
    };

    match state.store().update_password(&user.username, &hash) {
        Ok(()) => {
            debug!("Password updated for {}", user.username);
            (StatusCode::OK, Json(json!({"status": "password updated"}))).into_response()
        }
        Err(err) => {
            error!("Password update failed: {err}");
            AuthError::Internal.into_response()
        }
    }
}
