//! Process-wide configuration and shared state.

use crate::gardisto::lockout::{DEFAULT_THRESHOLD, LoginAttemptGuard};
use crate::gardisto::store::UserStore;
use crate::gardisto::token::TokenCodec;
use secrecy::SecretString;
use std::sync::Arc;

pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 7200;

/// Authentication settings fixed at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    issuer: String,
    token_ttl_seconds: i64,
    lockout_threshold: u32,
}

impl AuthConfig {
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            lockout_threshold: DEFAULT_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, token_ttl_seconds: i64) -> Self {
        self.token_ttl_seconds = token_ttl_seconds;
        self
    }

    #[must_use]
    pub fn with_lockout_threshold(mut self, lockout_threshold: u32) -> Self {
        self.lockout_threshold = lockout_threshold;
        self
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub const fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    #[must_use]
    pub const fn lockout_threshold(&self) -> u32 {
        self.lockout_threshold
    }
}

/// Shared per-process state injected into every handler.
pub struct AppState {
    config: AuthConfig,
    codec: Arc<TokenCodec>,
    guard: LoginAttemptGuard,
    store: Arc<dyn UserStore>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AuthConfig, secret: SecretString, store: Arc<dyn UserStore>) -> Self {
        let codec = Arc::new(TokenCodec::new(secret, config.issuer()));
        let guard = LoginAttemptGuard::new(config.lockout_threshold());
        Self {
            config,
            codec,
            guard,
            store,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> Arc<TokenCodec> {
        Arc::clone(&self.codec)
    }

    #[must_use]
    pub const fn guard(&self) -> &LoginAttemptGuard {
        &self.guard
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn UserStore> {
        Arc::clone(&self.store)
    }
}
