pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";
pub const ARG_SECRET: &str = "secret";
pub const ARG_ISSUER: &str = "issuer";
pub const ARG_TOKEN_TTL: &str = "token-ttl";
pub const ARG_LOCKOUT_THRESHOLD: &str = "lockout-threshold";

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("gardisto")
        .about("Token-based authentication and authorization service")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("GARDISTO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_SECRET)
                .short('s')
                .long("secret")
                .help("Token signing secret, at least 32 bytes")
                .env("GARDISTO_SECRET")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ISSUER)
                .long("issuer")
                .help("Issuer embedded in issued tokens and required on verification")
                .default_value("gardisto")
                .env("GARDISTO_ISSUER"),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL)
                .long("token-ttl")
                .help("Token lifetime in seconds")
                .default_value("7200")
                .env("GARDISTO_TOKEN_TTL")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new(ARG_LOCKOUT_THRESHOLD)
                .long("lockout-threshold")
                .help("Failed logins per identity before the account is locked")
                .default_value("5")
                .env("GARDISTO_LOCKOUT_THRESHOLD")
                .value_parser(clap::value_parser!(u32).range(1..)),
        );

    logging::with_args(command)
}
