//! Environment variable names used by this crate for convenient
//! configuration of the handler from services.
//!
//! These are purely helpers; the handler types themselves never read the
//! environment. See [`HandlerConfig::from_env`](crate::init::HandlerConfig::from_env).

/// Minimum level, e.g. `debug`, `INFO`, `warn+2`.
pub const LOG_HANDLER_LEVEL_ENV: &str = "LOG_HANDLER_LEVEL";

/// Display prefix printed before every message.
pub const LOG_HANDLER_PREFIX_ENV: &str = "LOG_HANDLER_PREFIX";

/// Attach `source=file:line` to records (`true`/`false`).
pub const LOG_HANDLER_SOURCE_ENV: &str = "LOG_HANDLER_SOURCE";

/// Print a timestamp at the start of each line (`true`/`false`).
pub const LOG_HANDLER_TIMESTAMP_ENV: &str = "LOG_HANDLER_TIMESTAMP";

/// Force colored output on or off (`true`/`false`).
pub const LOG_HANDLER_COLOR_ENV: &str = "LOG_HANDLER_COLOR";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag as written in environment variables.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
