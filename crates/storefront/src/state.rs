//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use sqlx::PgPool;

use crate::cache::StoreCache;
use crate::config::StorefrontConfig;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid session signing key: {0}")]
    SessionKey(String),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the connection pool, the cache and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    cache: StoreCache,
    cookie_key: Key,
}

impl AppState {
    /// Create a new application state with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the session signing key cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateError> {
        let cookie_key = derive_cookie_key(config.session_secret.expose_secret())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cache: StoreCache::new(),
                cookie_key,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the process cache.
    #[must_use]
    pub fn cache(&self) -> &StoreCache {
        &self.inner.cache
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.inner.cookie_key.clone()
    }
}

/// Stretch a secret of any length into a 64-byte cookie key.
///
/// # Errors
///
/// Returns `StateError::SessionKey` if the key material is rejected.
pub fn derive_cookie_key(secret: &str) -> Result<Key, StateError> {
    let digest = Sha512::digest(secret.as_bytes());
    Key::try_from(digest.as_slice()).map_err(|e| StateError::SessionKey(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secrets_still_produce_a_key() {
        assert!(derive_cookie_key("").is_ok());
        assert!(derive_cookie_key("x").is_ok());
    }

    #[test]
    fn test_key_derivation_is_deterministic() {
        let a = derive_cookie_key("same secret").unwrap();
        let b = derive_cookie_key("same secret").unwrap();
        let c = derive_cookie_key("other secret").unwrap();

        assert_eq!(a.signing(), b.signing());
        assert_ne!(a.signing(), c.signing());
    }
}
