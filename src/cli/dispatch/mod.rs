use crate::cli::{actions::Action, commands};
use anyhow::Result;
use secrecy::SecretString;

/// Build the action from parsed arguments.
///
/// # Errors
///
/// Returns an error if a required argument is missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let secret = matches
        .get_one::<String>(commands::ARG_SECRET)
        .map(|s| SecretString::from(s.to_string()))
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --secret"))?;

    Ok(Action::Server {
        port: matches
            .get_one::<u16>(commands::ARG_PORT)
            .copied()
            .unwrap_or(8080),
        secret,
        issuer: matches
            .get_one::<String>(commands::ARG_ISSUER)
            .map_or_else(|| "gardisto".to_string(), String::to_string),
        token_ttl_seconds: matches
            .get_one::<i64>(commands::ARG_TOKEN_TTL)
            .copied()
            .unwrap_or(7200),
        lockout_threshold: matches
            .get_one::<u32>(commands::ARG_LOCKOUT_THRESHOLD)
            .copied()
            .unwrap_or(5),
    })
}
