//! Ordered interceptor chain with explicit short-circuit control.
//!
//! Each interceptor receives the request exchange and a one-shot `Next`
//! capability. Calling `Next::proceed` runs the remainder of the chain and
//! the terminal handler, then returns control so the interceptor can run
//! post-logic (the onion model). Returning `Outcome::Abort` — or simply not
//! calling `proceed` — makes every downstream stage, including the handler,
//! structurally unreachable.
//!
//! Chains are per-request values; nothing carries over between requests. A
//! panic inside an interceptor or the handler is contained at `Chain::run`
//! and reported as an aborted chain instead of tearing down the worker.

use crate::gardisto::error::AuthError;
use crate::gardisto::token::Claims;
use axum::http::HeaderMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Request-scoped view of the verified identity.
///
/// Populated by the authentication interceptor, read by authorization and
/// the handler; owned by a single request, never shared across requests.
#[derive(Debug, Default, Clone)]
pub struct AuthContext {
    subject: Option<String>,
    role: Option<String>,
    permissions: Vec<String>,
}

impl AuthContext {
    pub fn set_claims(&mut self, claims: &Claims) {
        self.subject = Some(claims.sub.clone());
        self.role = Some(claims.role.clone());
        self.permissions = claims.permissions.clone();
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    #[must_use]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }
}

/// The per-request unit of work flowing through the chain: the inbound
/// headers plus the mutable [`AuthContext`].
pub struct Exchange<'r> {
    headers: &'r HeaderMap,
    context: AuthContext,
}

impl<'r> Exchange<'r> {
    #[must_use]
    pub fn new(headers: &'r HeaderMap) -> Self {
        Self {
            headers,
            context: AuthContext::default(),
        }
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.headers
    }

    #[must_use]
    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut AuthContext {
        &mut self.context
    }

    #[must_use]
    pub fn into_context(self) -> AuthContext {
        self.context
    }
}

/// An interceptor's decision for the downstream chain.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Proceed,
    Abort(AuthError),
}

/// Terminal stage invoked after the last interceptor proceeds.
pub type HandlerFn = dyn Fn(&mut Exchange<'_>) -> Outcome + Send + Sync;

/// One-shot capability to run the rest of the chain.
///
/// Consumed by [`Next::proceed`], so an interceptor cannot invoke its
/// downstream more than once.
pub struct Next<'c> {
    interceptors: &'c [&'c dyn Interceptor],
    handler: &'c HandlerFn,
}

impl Next<'_> {
    /// Transfer control to the next interceptor, or the terminal handler if
    /// this was the last one. Returns once the downstream chain has fully
    /// unwound, so the caller can run post-logic.
    pub fn proceed(self, exchange: &mut Exchange<'_>) -> Outcome {
        match self.interceptors.split_first() {
            Some((head, tail)) => head.handle(
                exchange,
                Next {
                    interceptors: tail,
                    handler: self.handler,
                },
            ),
            None => (self.handler)(exchange),
        }
    }
}

pub trait Interceptor: Send + Sync {
    fn handle(&self, exchange: &mut Exchange<'_>, next: Next<'_>) -> Outcome;
}

/// Terminal state of one chain execution.
#[derive(Debug, PartialEq, Eq)]
pub enum ChainOutcome {
    Completed,
    Aborted(AuthError),
}

/// An ordered sequence of interceptors ending in a terminal handler.
#[derive(Default)]
pub struct Chain {
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl Chain {
    #[must_use]
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    /// Run the chain to completion or abort.
    ///
    /// This is the failure boundary: a panicking interceptor or handler is
    /// caught here and converted into `Aborted(AuthError::Internal)` so the
    /// serving process survives and no chain state leaks to other requests.
    pub fn run(&self, exchange: &mut Exchange<'_>, handler: &HandlerFn) -> ChainOutcome {
        let refs: Vec<&dyn Interceptor> = self.interceptors.iter().map(Box::as_ref).collect();
        let next = Next {
            interceptors: &refs,
            handler,
        };
        match catch_unwind(AssertUnwindSafe(|| next.proceed(exchange))) {
            Ok(Outcome::Proceed) => ChainOutcome::Completed,
            Ok(Outcome::Abort(err)) => ChainOutcome::Aborted(err),
            Err(_) => ChainOutcome::Aborted(AuthError::Internal),
        }
    }
}
