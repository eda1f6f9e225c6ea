//! One-way password hashing.
//!
//! argon2id with per-call random salts; the salt and parameters travel in
//! the PHC string, so two hashes of the same password never match and
//! verification needs no side channel.

use crate::gardisto::error::AuthError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a password into a PHC-format string.
///
/// # Errors
///
/// Returns `AuthError::Hashing` only on internal randomness or parameter
/// failure; never for any particular password value.
pub fn hash(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hashed| hashed.to_string())
        .map_err(|err| AuthError::Hashing(err.to_string()))
}

/// Verify a password against a stored PHC string.
///
/// Malformed stored hashes verify as `false` rather than erroring; the
/// comparison itself is constant-time inside argon2.
#[must_use]
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
