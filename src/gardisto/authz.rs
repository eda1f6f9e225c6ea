//! Bearer authentication and role/permission authorization interceptors.

use crate::gardisto::chain::{Chain, ChainOutcome, Exchange, Interceptor, Next, Outcome};
use crate::gardisto::error::AuthError;
use crate::gardisto::state::AppState;
use crate::gardisto::token::{TokenCodec, unix_now};
use axum::http::{HeaderMap, header::AUTHORIZATION};
use std::sync::Arc;

/// Extract the bearer token from an `Authorization` header.
///
/// The header value must be exactly two space-separated parts, the first
/// being the literal `Bearer`. Anything else (missing header, empty value,
/// wrong scheme, extra parts) is a malformed header, never a valid token.
///
/// # Errors
///
/// Returns `AuthError::MalformedHeader` when the header is absent or does
/// not match the scheme.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MalformedHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Any-of role check.
#[must_use]
pub fn role_allowed(role: &str, accepted: &[&str]) -> bool {
    accepted.iter().any(|candidate| *candidate == role)
}

/// Exact permission membership; no wildcarding or prefix matching.
#[must_use]
pub fn has_permission(held: &[String], required: &str) -> bool {
    held.iter().any(|permission| permission == required)
}

/// Verifies the bearer token and writes its claims into the exchange
/// context for downstream stages.
pub struct BearerAuthenticator {
    codec: Arc<TokenCodec>,
}

impl BearerAuthenticator {
    #[must_use]
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl Interceptor for BearerAuthenticator {
    fn handle(&self, exchange: &mut Exchange<'_>, next: Next<'_>) -> Outcome {
        let token = match bearer_token(exchange.headers()) {
            Ok(token) => token,
            Err(err) => return Outcome::Abort(err),
        };
        match self.codec.verify(token, unix_now()) {
            Ok(claims) => {
                exchange.context_mut().set_claims(&claims);
                next.proceed(exchange)
            }
            Err(err) => Outcome::Abort(err),
        }
    }
}

/// Allows the request when the verified role is any of the accepted ones.
///
/// A missing role means authentication never ran, which is reported as an
/// invalid token rather than a forbidden request.
pub struct RequireRole {
    accepted: Vec<String>,
}

impl RequireRole {
    #[must_use]
    pub fn any_of(accepted: &[&str]) -> Self {
        Self {
            accepted: accepted.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Interceptor for RequireRole {
    fn handle(&self, exchange: &mut Exchange<'_>, next: Next<'_>) -> Outcome {
        let Some(role) = exchange.context().role() else {
            return Outcome::Abort(AuthError::TokenInvalid);
        };
        let accepted: Vec<&str> = self.accepted.iter().map(String::as_str).collect();
        if role_allowed(role, &accepted) {
            next.proceed(exchange)
        } else {
            Outcome::Abort(AuthError::Forbidden)
        }
    }
}

/// Allows the request when the verified permission set contains the exact
/// required entry. No wildcarding or prefix matching.
pub struct RequirePermission {
    required: String,
}

impl RequirePermission {
    #[must_use]
    pub fn new(required: impl Into<String>) -> Self {
        Self {
            required: required.into(),
        }
    }
}

impl Interceptor for RequirePermission {
    fn handle(&self, exchange: &mut Exchange<'_>, next: Next<'_>) -> Outcome {
        let context = exchange.context();
        if context.subject().is_none() {
            return Outcome::Abort(AuthError::TokenInvalid);
        }
        if has_permission(context.permissions(), &self.required) {
            next.proceed(exchange)
        } else {
            Outcome::Abort(AuthError::Forbidden)
        }
    }
}

/// Run the standard protected-route chain and return the verified context.
///
/// Stages run in order: bearer authentication, then role, then optional
/// permission. Handlers call this first and only touch business logic once
/// it returns `Ok`.
///
/// # Errors
///
/// Returns the aborting stage's error, which maps to 401 or 403 at the
/// HTTP boundary.
pub fn authorize(
    headers: &HeaderMap,
    state: &AppState,
    roles: &[&str],
    permission: Option<&str>,
) -> Result<crate::gardisto::chain::AuthContext, AuthError> {
    let mut chain = Chain::new()
        .with(BearerAuthenticator::new(state.codec()))
        .with(RequireRole::any_of(roles));
    if let Some(required) = permission {
        chain = chain.with(RequirePermission::new(required));
    }

    let mut exchange = Exchange::new(headers);
    match chain.run(&mut exchange, &|_exchange| Outcome::Proceed) {
        ChainOutcome::Completed => Ok(exchange.into_context()),
        ChainOutcome::Aborted(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gardisto::token::Claims;
    use axum::http::HeaderValue;
    use secrecy::SecretString;

    const ISSUER: &str = "auth.example.test";

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(
            SecretString::from("0123456789abcdef0123456789abcdef".to_string()),
            ISSUER,
        ))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn predicates() {
        assert!(role_allowed("admin", &["user", "admin"]));
        assert!(!role_allowed("guest", &["user", "admin"]));
        assert!(!role_allowed("admin", &[]));

        let held = vec!["profile:read".to_string()];
        assert!(has_permission(&held, "profile:read"));
        assert!(!has_permission(&held, "profile"));
        assert!(!has_permission(&held, "profile:read:all"));
    }

    #[test]
    fn bearer_token_accepts_exactly_two_parts() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_rejects_malformed_values() {
        for value in [
            "abc.def.ghi",
            "Basic abc",
            "bearer abc",
            "Bearer",
            "Bearer ",
            "Bearer a b",
            "Bearer  abc",
            "",
        ] {
            let headers = headers_with(value);
            assert_eq!(
                bearer_token(&headers),
                Err(AuthError::MalformedHeader),
                "value {value:?} should be malformed"
            );
        }
        assert_eq!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn authenticator_sets_claims_for_a_valid_token() {
        let codec = codec();
        let claims = Claims::new(
            "tom",
            "user",
            vec!["profile:read".to_string()],
            ISSUER,
            unix_now(),
            120,
        );
        let token = codec.issue(&claims).unwrap();
        let headers = headers_with(&format!("Bearer {token}"));

        let chain = Chain::new().with(BearerAuthenticator::new(codec));
        let mut exchange = Exchange::new(&headers);
        let outcome = chain.run(&mut exchange, &|exchange| {
            assert_eq!(exchange.context().subject(), Some("tom"));
            assert_eq!(exchange.context().role(), Some("user"));
            Outcome::Proceed
        });
        assert_eq!(outcome, ChainOutcome::Completed);
    }

    #[test]
    fn role_gate_accepts_any_listed_role() {
        let claims = Claims::new("tom", "admin", vec![], ISSUER, unix_now(), 120);
        let headers = HeaderMap::new();
        let mut exchange = Exchange::new(&headers);
        exchange.context_mut().set_claims(&claims);

        let chain = Chain::new().with(RequireRole::any_of(&["user", "admin"]));
        let outcome = chain.run(&mut exchange, &|_exchange| Outcome::Proceed);
        assert_eq!(outcome, ChainOutcome::Completed);
    }

    #[test]
    fn role_gate_rejects_unlisted_role() {
        let claims = Claims::new("tom", "user", vec![], ISSUER, unix_now(), 120);
        let headers = HeaderMap::new();
        let mut exchange = Exchange::new(&headers);
        exchange.context_mut().set_claims(&claims);

        let chain = Chain::new().with(RequireRole::any_of(&["admin"]));
        let outcome = chain.run(&mut exchange, &|_exchange| Outcome::Proceed);
        assert_eq!(outcome, ChainOutcome::Aborted(AuthError::Forbidden));
    }

    #[test]
    fn role_gate_without_authentication_is_invalid_token_not_forbidden() {
        let headers = HeaderMap::new();
        let mut exchange = Exchange::new(&headers);
        let chain = Chain::new().with(RequireRole::any_of(&["admin"]));
        let outcome = chain.run(&mut exchange, &|_exchange| Outcome::Proceed);
        assert_eq!(outcome, ChainOutcome::Aborted(AuthError::TokenInvalid));
    }

    #[test]
    fn permission_gate_requires_exact_membership() {
        let claims = Claims::new(
            "tom",
            "user",
            vec!["profile:read".to_string()],
            ISSUER,
            unix_now(),
            120,
        );
        let headers = HeaderMap::new();

        let mut exchange = Exchange::new(&headers);
        exchange.context_mut().set_claims(&claims);
        let granted = Chain::new().with(RequirePermission::new("profile:read"));
        assert_eq!(
            granted.run(&mut exchange, &|_exchange| Outcome::Proceed),
            ChainOutcome::Completed
        );

        let mut exchange = Exchange::new(&headers);
        exchange.context_mut().set_claims(&claims);
        let denied = Chain::new().with(RequirePermission::new("profile"));
        assert_eq!(
            denied.run(&mut exchange, &|_exchange| Outcome::Proceed),
            ChainOutcome::Aborted(AuthError::Forbidden)
        );
    }
}
