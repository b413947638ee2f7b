//! Storefront configuration loaded from environment variables.
//!
//! Every variable is optional; the defaults match a local benchmark setup.
//!
//! # Environment Variables
//!
//! ## Server
//! - `BAKUGAI_HOST` - Bind address (default: 127.0.0.1)
//! - `BAKUGAI_PORT` - Listen port (default: 8080)
//! - `BAKUGAI_PUBLIC_DIR` - Static files (default: crates/storefront/public)
//! - `BAKUGAI_SESSION_SECRET` - Session cookie signing secret (insecure default)
//!
//! ## Database
//! - `BAKUGAI_DB_HOST` - `PostgreSQL` host (default: localhost)
//! - `BAKUGAI_DB_PORT` - `PostgreSQL` port (default: 5432)
//! - `BAKUGAI_DB_USER` - Username (default: bakugai)
//! - `BAKUGAI_DB_PASSWORD` - Password (default: bakugai)
//! - `BAKUGAI_DB_NAME` - Database name (default: bakugai)
//! - `BAKUGAI_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Fallback signing secret used when `BAKUGAI_SESSION_SECRET` is unset.
pub const DEFAULT_SESSION_SECRET: &str = "bakugai_insecure_default";

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory served for product images and stylesheets
    pub public_dir: PathBuf,
    /// Session cookie signing secret
    pub session_secret: SecretString,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// `PostgreSQL` connection settings.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub name: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("BAKUGAI_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("BAKUGAI_PORT", "8080")?;
        let public_dir = PathBuf::from(get_env_or_default(
            "BAKUGAI_PUBLIC_DIR",
            "crates/storefront/public",
        ));
        let session_secret = SecretString::from(get_env_or_default(
            "BAKUGAI_SESSION_SECRET",
            DEFAULT_SESSION_SECRET,
        ));

        Ok(Self {
            host,
            port,
            public_dir,
            session_secret,
            database: DatabaseConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Describe why the session secret is unsafe, if it is.
    ///
    /// The storefront still starts with a weak secret; the caller logs the
    /// returned reason as a warning.
    #[must_use]
    pub fn session_secret_weakness(&self) -> Option<String> {
        let value = self.session_secret.expose_secret();
        if value == DEFAULT_SESSION_SECRET {
            return Some("BAKUGAI_SESSION_SECRET is unset, using the built-in default".to_string());
        }
        if value.len() < MIN_SESSION_SECRET_LENGTH {
            return Some(format!(
                "BAKUGAI_SESSION_SECRET should be at least {MIN_SESSION_SECRET_LENGTH} characters (got {})",
                value.len()
            ));
        }
        let entropy = shannon_entropy(value);
        if entropy < MIN_ENTROPY_BITS_PER_CHAR {
            return Some(format!(
                "BAKUGAI_SESSION_SECRET entropy too low ({entropy:.2} bits/char, want >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ));
        }
        None
    }
}

impl DatabaseConfig {
    /// Load database settings from `BAKUGAI_DB_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the port or pool size cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: get_env_or_default("BAKUGAI_DB_HOST", "localhost"),
            port: parse_env_or_default::<u16>("BAKUGAI_DB_PORT", "5432")?,
            username: get_env_or_default("BAKUGAI_DB_USER", "bakugai"),
            password: SecretString::from(get_env_or_default("BAKUGAI_DB_PASSWORD", "bakugai")),
            name: get_env_or_default("BAKUGAI_DB_NAME", "bakugai"),
            max_connections: parse_env_or_default::<u32>("BAKUGAI_DB_MAX_CONNECTIONS", "10")?,
        })
    }

    /// Build `sqlx` connection options from the individual settings.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .database(&self.name)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}
