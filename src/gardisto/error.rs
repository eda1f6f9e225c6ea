//! Error taxonomy for the authentication pipeline.
//!
//! Kinds are grouped at the HTTP boundary: everything in the
//! "unauthenticated" family maps to a single uniform 401 body, and
//! `AccountLocked` is indistinguishable from `InvalidCredentials` in the
//! response so lockout state does not leak to callers. Internal failures are
//! logged with detail and surfaced as a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header missing or malformed")]
    MalformedHeader,
    #[error("invalid token")]
    TokenInvalid,
    #[error("token expired")]
    TokenExpired,
    #[error("token not yet valid")]
    TokenNotYetValid,
    #[error("forbidden")]
    Forbidden,
    #[error("account locked")]
    AccountLocked,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("hashing failure: {0}")]
    Hashing(String),
    #[error("internal error")]
    Internal,
}

impl AuthError {
    /// True for the kinds surfaced uniformly as "not authenticated".
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader | Self::TokenInvalid | Self::TokenExpired | Self::TokenNotYetValid
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MalformedHeader
            | Self::TokenInvalid
            | Self::TokenExpired
            | Self::TokenNotYetValid => (StatusCode::UNAUTHORIZED, "not authenticated"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            // Uniform message: a locked account must not be distinguishable
            // from a wrong password.
            Self::AccountLocked | Self::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid username or password")
            }
            Self::Hashing(detail) => {
                error!("Credential hashing failed: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
