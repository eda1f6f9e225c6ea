use crate::gardisto::{
    error::AuthError,
    handlers::{valid_email, valid_password, valid_username},
    password,
    state::AppState,
    store::{StoreError, User},
    token::unix_now,
};
use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", content_type = "application/json"),
        (status = 400, description = "Invalid username, email or weak password"),
        (status = 409, description = "Username already taken"),
    ),
    tag = "register"
)]
// axum handler for register
#[instrument(skip(state, payload))]
pub async fn register(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing payload"})),
        )
            .into_response();
    };

    if !valid_username(&request.username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid username"})),
        )
            .into_response();
    }
    if !valid_email(&request.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid email"})),
        )
            .into_response();
    }
    if !valid_password(&request.password) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "password does not meet the strength policy"})),
        )
            .into_response();
    }

    // Argon2 is CPU-bound, keep it off the async workers.
    let password = request.password;
    let hash = match tokio::task::spawn_blocking(move || password::hash(&password)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(err)) => return err.into_response(),
        Err(err) => {
            error!("Hashing task failed: {err}");
            return AuthError::Internal.into_response();
        }
    };

    let user = User::new(&request.username, hash, &request.email, unix_now());
    let id = user.id;
    match state.store().insert(user) {
        Ok(()) => {
            debug!("Registered user {}", request.username);
            (
                StatusCode::CREATED,
                Json(json!({"id": id, "username": request.username})),
            )
                .into_response()
        }
        Err(StoreError::DuplicateUsername) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "username already taken"})),
        )
            .into_response(),
        Err(err) => {
            error!("User insert failed: {err}");
            AuthError::Internal.into_response()
        }
    }
}
