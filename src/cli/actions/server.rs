use crate::cli::actions::Action;
use crate::gardisto::{
    self,
    state::{AppState, AuthConfig},
    store::InMemoryUserStore,
};
use anyhow::Result;
use std::sync::Arc;

/// Handle the server action
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn handle(action: Action) -> Result<()> {
    let Action::Server {
        port,
        secret,
        issuer,
        token_ttl_seconds,
        lockout_threshold,
    } = action;

    let config = AuthConfig::new(issuer)
        .with_token_ttl_seconds(token_ttl_seconds)
        .with_lockout_threshold(lockout_threshold);

    let state = Arc::new(AppState::new(
        config,
        secret,
        Arc::new(InMemoryUserStore::new()),
    ));

    gardisto::serve(port, state).await
}
