//! Backend configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Settings that address external
//! collaborators with credentials (language-model provider, SMTP relay,
//! database) are required and fail fast at startup; everything else falls
//! back to a sensible default.

use std::net::SocketAddr;

/// Error raised when required configuration is missing or malformed.
///
/// Raised from [`AppConfig::from_env`] before the server binds, so a
/// misconfigured process never serves a single request.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for {key}: {message}")]
    InvalidVar {
        /// The offending environment variable.
        key: &'static str,
        /// Parser failure description.
        message: String,
    },
}

/// Top-level backend configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`] and handed to each
/// collaborator at construction time; no module holds global state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Snapshot GraphQL hub endpoint.
    pub snapshot_graphql_url: String,

    /// Base URL of the OpenAI-compatible completion API.
    pub openai_base_url: String,

    /// API key for the completion provider.
    pub openai_api_key: String,

    /// Hostname of the SMTP relay used for recommendation summaries.
    pub smtp_host: String,

    /// SMTP relay port.
    pub smtp_port: u16,

    /// Optional SMTP username (paired with [`Self::smtp_password`]).
    pub smtp_username: Option<String>,

    /// Optional SMTP password.
    pub smtp_password: Option<String>,

    /// Sender address for outgoing recommendation summaries.
    pub email_from: String,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    /// Optional settings fall back to defaults; `DATABASE_URL`,
    /// `OPENAI_API_KEY`, `SMTP_HOST`, and `EMAIL_FROM` are required.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is absent or if
    /// `LISTEN_ADDR` cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidVar {
                key: "LISTEN_ADDR",
                message: e.to_string(),
            })?;

        let database_url = require_env("DATABASE_URL")?;

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10);
        let database_min_connections = parse_env("DATABASE_MIN_CONNECTIONS", 2);
        let database_connect_timeout_secs = parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5);

        let snapshot_graphql_url = std::env::var("SNAPSHOT_GRAPHQL_URL")
            .unwrap_or_else(|_| "https://hub.snapshot.org/graphql".to_string());

        let openai_base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let openai_api_key = require_env("OPENAI_API_KEY")?;

        let smtp_host = require_env("SMTP_HOST")?;
        let smtp_port = parse_env("SMTP_PORT", 587);
        let smtp_username = std::env::var("SMTP_USERNAME").ok().filter(|v| !v.is_empty());
        let smtp_password = std::env::var("SMTP_PASSWORD").ok().filter(|v| !v.is_empty());
        let email_from = require_env("EMAIL_FROM")?;

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout_secs,
            snapshot_graphql_url,
            openai_base_url,
            openai_api_key,
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            email_from,
        })
    }
}

/// Reads a required environment variable, rejecting unset or empty values.
fn require_env(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic, unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn require_env_rejects_empty() {
        // Keys are test-unique to avoid cross-test races.
        unsafe { std::env::set_var("DIPLOMAT_TEST_EMPTY", "") };
        let result = require_env("DIPLOMAT_TEST_EMPTY");
        assert!(matches!(result, Err(ConfigError::MissingVar(_))));
    }

    #[test]
    fn require_env_returns_value() {
        unsafe { std::env::set_var("DIPLOMAT_TEST_SET", "value") };
        let result = require_env("DIPLOMAT_TEST_SET");
        let Ok(value) = result else {
            panic!("expected value");
        };
        assert_eq!(value, "value");
    }

    #[test]
    fn parse_env_falls_back_on_garbage() {
        unsafe { std::env::set_var("DIPLOMAT_TEST_GARBAGE", "not-a-number") };
        let parsed: u32 = parse_env("DIPLOMAT_TEST_GARBAGE", 7);
        assert_eq!(parsed, 7);
    }
}
