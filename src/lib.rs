//! # Gardisto (Authentication & Authorization Service)
//!
//! `gardisto` is a small identity service: it registers users, exchanges
//! credentials for signed session tokens, and gates protected endpoints
//! behind an interceptor chain.
//!
//! ## Tokens
//!
//! Session tokens are compact three-segment strings
//! (`base64url(header).base64url(claims).base64url(signature)`) signed with
//! HMAC-SHA-256. The verifier pins the algorithm: the token's own header is
//! never trusted to select the verification scheme.
//!
//! ## Request pipeline
//!
//! Protected routes run an ordered chain of interceptors with explicit
//! short-circuit semantics. Authentication (bearer token extraction and
//! verification) always runs before authorization (role/permission checks),
//! so a missing or invalid token yields "not authenticated", never
//! "forbidden". An abort at any stage makes the downstream stages and the
//! handler unreachable.
//!
//! ## Lockout
//!
//! Failed logins are counted per identity in a mutex-guarded table. Once the
//! threshold is reached, further attempts are rejected with the same uniform
//! message as a wrong password, so lockout state is not observable from the
//! outside.

pub mod cli;
pub mod gardisto;
