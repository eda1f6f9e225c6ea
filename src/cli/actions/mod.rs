pub mod server;

use secrecy::SecretString;

/// Actions the CLI can dispatch to.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        secret: SecretString,
        issuer: String,
        token_ttl_seconds: i64,
        lockout_threshold: u32,
    },
}
