pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod login;
pub use self::login::login;

pub mod me;
pub use self::me::me;

pub mod users;
pub use self::users::users;

pub mod admin;
pub use self::admin::dashboard;

pub mod account;
pub use self::account::change_password;

// common validation helpers for the handlers
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Usernames are lowercase alphanumeric with `_` or `-`, 3 to 32
/// characters, starting with a letter or digit.
#[must_use]
pub fn valid_username(username: &str) -> bool {
    Regex::new(r"^[a-z0-9][a-z0-9_-]{2,31}$").is_ok_and(|re| re.is_match(username))
}

/// Password strength policy: 8 to 128 characters with at least one
/// uppercase letter, one lowercase letter, one digit and one symbol.
#[must_use]
pub fn valid_password(password: &str) -> bool {
    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return false;
    }
    password.chars().any(char::is_uppercase)
        && password.chars().any(char::is_lowercase)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric())
}
