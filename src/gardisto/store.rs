//! User persistence behind a trait seam.
//!
//! The in-memory store backs the demo deployment and the tests; a real
//! backend plugs in through [`UserStore`] without touching handlers.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_ROLE: &str = "user";
pub const DEFAULT_PERMISSIONS: &[&str] = &["profile:read"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("username already taken")]
    DuplicateUsername,
    #[error("user not found")]
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub created_at_unix: i64,
}

impl User {
    /// New user with the default role and permission set.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
        created_at_unix: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            email: email.into(),
            role: DEFAULT_ROLE.to_string(),
            permissions: DEFAULT_PERMISSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            created_at_unix,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }
}

pub trait UserStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Option<User>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateUsername` when the username exists.
    fn insert(&self, user: User) -> Result<(), StoreError>;

    /// Replace the stored password hash for `username`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when no such user exists.
    fn update_password(&self, username: &str, password_hash: &str) -> Result<(), StoreError>;
}

/// Keyed by username; usernames are unique.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned()
    }

    fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    fn update_password(&self, username: &str, password_hash: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let user = users.get_mut(username).ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}
