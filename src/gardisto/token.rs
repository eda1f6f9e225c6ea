//! Signed session tokens.
//!
//! Wire format is three base64url segments joined by `.`:
//! `header JSON`, `claims JSON`, `HMAC-SHA-256 signature` over
//! `header.claims`. The verifier pins the algorithm to HS256 from its own
//! configuration; a token header declaring anything else is rejected before
//! any claim is trusted, which blocks algorithm-substitution downgrades.

use crate::gardisto::error::AuthError;
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "HS256";

/// Current time as Unix seconds.
#[must_use]
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Identity and authorization facts embedded in a token.
///
/// Valid only for `nbf <= now < exp`; stateless once issued, the server
/// keeps no record of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
}

impl Claims {
    /// Build claims valid from `now` for `ttl_seconds`.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        role: impl Into<String>,
        permissions: Vec<String>,
        issuer: impl Into<String>,
        now: i64,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            sub: subject.into(),
            role: role.into(),
            permissions,
            iat: now,
            exp: now + ttl_seconds,
            nbf: now,
            iss: issuer.into(),
        }
    }
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json = serde_json::to_vec(value).map_err(|_| AuthError::Internal)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, AuthError> {
    let bytes = Base64UrlUnpadded::decode_vec(segment).map_err(|_| AuthError::TokenInvalid)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::TokenInvalid)
}

/// Issues and verifies HS256 session tokens with a single active key.
///
/// Stateless and safe for unsynchronized concurrent use; share by `Arc`.
pub struct TokenCodec {
    key: SecretString,
    issuer: String,
}

impl TokenCodec {
    #[must_use]
    pub fn new(key: SecretString, issuer: impl Into<String>) -> Self {
        Self {
            key,
            issuer: issuer.into(),
        }
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    fn mac(&self, signing_input: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|_| AuthError::Internal)?;
        mac.update(signing_input.as_bytes());
        Ok(mac)
    }

    /// Create a signed token for the given claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if encoding or keying fails.
    pub fn issue(&self, claims: &Claims) -> Result<String, AuthError> {
        let header_b64 = b64e_json(&TokenHeader::hs256())?;
        let claims_b64 = b64e_json(claims)?;
        let signing_input = format!("{header_b64}.{claims_b64}");

        let signature = self.mac(&signing_input)?.finalize().into_bytes();
        let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

        Ok(format!("{signing_input}.{signature_b64}"))
    }

    /// Verify a token against this codec's key and pinned algorithm, and
    /// return its decoded claims.
    ///
    /// # Errors
    ///
    /// - `TokenInvalid` for structural problems (wrong segment count,
    ///   undecodable base64/JSON), a non-HS256 header, a signature
    ///   mismatch, or a foreign issuer.
    /// - `TokenExpired` when `now >= exp`; `TokenNotYetValid` when
    ///   `now < nbf`. Temporal checks run only after the signature holds.
    pub fn verify(&self, token: &str, now_unix_seconds: i64) -> Result<Claims, AuthError> {
        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(AuthError::TokenInvalid)?;
        let claims_b64 = parts.next().ok_or(AuthError::TokenInvalid)?;
        let signature_b64 = parts.next().ok_or(AuthError::TokenInvalid)?;
        if parts.next().is_some() {
            return Err(AuthError::TokenInvalid);
        }

        // Algorithm pinning: the verifier decides the scheme, never the
        // token. Anything but our own header shape is rejected outright.
        let header: TokenHeader = b64d_json(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(AuthError::TokenInvalid);
        }

        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature_bytes =
            Base64UrlUnpadded::decode_vec(signature_b64).map_err(|_| AuthError::TokenInvalid)?;
        // Mac::verify_slice is a constant-time comparison.
        self.mac(&signing_input)?
            .verify_slice(&signature_bytes)
            .map_err(|_| AuthError::TokenInvalid)?;

        let claims: Claims = b64d_json(claims_b64)?;
        if claims.iss != self.issuer {
            return Err(AuthError::TokenInvalid);
        }
        if now_unix_seconds >= claims.exp {
            return Err(AuthError::TokenExpired);
        }
        if now_unix_seconds < claims.nbf {
            return Err(AuthError::TokenNotYetValid);
        }

        Ok(claims)
    }
}
