use crate::gardisto::{
    error::AuthError,
    password,
    state::AppState,
    token::{Claims, unix_now},
};
use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, returns a bearer token", content_type = "application/json"),
        (status = 400, description = "Missing payload"),
        (status = 401, description = "Invalid username or password"),
    ),
    tag = "login"
)]
// axum handler for login
#[instrument(skip(state, payload))]
pub async fn login(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing payload"})),
        )
            .into_response();
    };

    // The lockout check runs before any credential work, so a locked
    // identity costs nothing and reveals nothing.
    if state.guard().is_locked(&request.username) {
        warn!("Locked account attempted login: {}", request.username);
        return AuthError::AccountLocked.into_response();
    }

    let Some(user) = state.store().find_by_username(&request.username) else {
        state.guard().record_failure(&request.username);
        return AuthError::InvalidCredentials.into_response();
    };

    let password = request.password;
    let stored_hash = user.password_hash.clone();
    let verified =
        match tokio::task::spawn_blocking(move || password::verify(&password, &stored_hash)).await
        {
            Ok(verified) => verified,
            Err(err) => {
                error!("Verification task failed: {err}");
                return AuthError::Internal.into_response();
            }
        };

    if !verified {
        state.guard().record_failure(&request.username);
        return AuthError::InvalidCredentials.into_response();
    }

    state.guard().record_success(&request.username);

    let claims = Claims::new(
        &user.username,
        &user.role,
        user.permissions.clone(),
        state.codec().issuer(),
        unix_now(),
        state.config().token_ttl_seconds(),
    );
    match state.codec().issue(&claims) {
        Ok(token) => {
            debug!("Issued token for {}", user.username);
            (StatusCode::OK, Json(json!({"token": token}))).into_response()
        }
        Err(err) => err.into_response(),
    }
}
