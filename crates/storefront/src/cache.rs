//! Process-local cache for store reads.
//!
//! A string-keyed `moka` cache shared by every request in the process. There
//! is no expiry and no invalidation: an entry, once written, lives until the
//! process exits. Absent rows are cached too, so a product page for an
//! unknown id keeps rendering as "not found" even if the row appears later.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;

use bakugai_core::{ProductId, UserId};

use crate::db::RepositoryError;
use crate::models::{Product, ProductSummary, User};

/// Cache key for store reads.
///
/// Rendered to its string form before touching the cache.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// One listing page, keyed by its id offset.
    ProductsOffset(i32),
    /// A single product record.
    Product(ProductId),
    /// A user profile.
    User(UserId),
    /// Marker that a user has bought a product at least once.
    UserHasProduct { user: UserId, product: ProductId },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductsOffset(offset) => write!(f, "products_offset_{offset}"),
            Self::Product(id) => write!(f, "product_{id}"),
            Self::User(id) => write!(f, "user_{id}"),
            Self::UserHasProduct { user, product } => {
                write!(f, "user_{user}_has_product_{product}")
            }
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<[ProductSummary]>),
    Product(Option<Arc<Product>>),
    User(Option<Arc<User>>),
    Flag,
}

impl CacheValue {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Products(_) => "products",
            Self::Product(_) => "product",
            Self::User(_) => "user",
            Self::Flag => "flag",
        }
    }
}

/// Fetch-or-populate cache in front of the store.
#[derive(Clone)]
pub struct StoreCache {
    inner: Cache<String, CacheValue>,
}

impl Default for StoreCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreCache {
    /// Create an empty, unbounded cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().name("bakugai-store").build(),
        }
    }

    /// Return the cached value for `key`, or run `populate` and store its result.
    ///
    /// When two requests miss at the same time both run `populate`; the first
    /// write wins and both get that value.
    async fn fetch_or_populate<F>(
        &self,
        key: CacheKey,
        populate: F,
    ) -> Result<CacheValue, RepositoryError>
    where
        F: Future<Output = Result<CacheValue, RepositoryError>>,
    {
        let key = key.to_string();
        if let Some(value) = self.inner.get(&key).await {
            tracing::trace!(cache_key = %key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(cache_key = %key, "cache miss");
        let value = populate.await?;
        Ok(self.inner.entry(key).or_insert(value).await.into_value())
    }

    /// Listing page for `offset`, loading it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, or `RepositoryError::DataCorruption` if the
    /// key holds a different kind of value.
    pub async fn products_at_offset<F>(
        &self,
        offset: i32,
        load: F,
    ) -> Result<Arc<[ProductSummary]>, RepositoryError>
    where
        F: Future<Output = Result<Vec<ProductSummary>, RepositoryError>>,
    {
        let key = CacheKey::ProductsOffset(offset);
        let value = self
            .fetch_or_populate(key, async { Ok(CacheValue::Products(load.await?.into())) })
            .await?;

        match value {
            CacheValue::Products(products) => Ok(products),
            other => Err(mismatch(key, &other)),
        }
    }

    /// Product record for `id`, loading it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, or `RepositoryError::DataCorruption` if the
    /// key holds a different kind of value.
    pub async fn product<F>(
        &self,
        id: ProductId,
        load: F,
    ) -> Result<Option<Arc<Product>>, RepositoryError>
    where
        F: Future<Output = Result<Option<Product>, RepositoryError>>,
    {
        let key = CacheKey::Product(id);
        let value = self
            .fetch_or_populate(key, async { Ok(CacheValue::Product(load.await?.map(Arc::new))) })
            .await?;

        match value {
            CacheValue::Product(product) => Ok(product),
            other => Err(mismatch(key, &other)),
        }
    }

    /// User profile for `id`, loading it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, or `RepositoryError::DataCorruption` if the
    /// key holds a different kind of value.
    pub async fn user<F>(&self, id: UserId, load: F) -> Result<Option<Arc<User>>, RepositoryError>
    where
        F: Future<Output = Result<Option<User>, RepositoryError>>,
    {
        let key = CacheKey::User(id);
        let value = self
            .fetch_or_populate(key, async { Ok(CacheValue::User(load.await?.map(Arc::new))) })
            .await?;

        match value {
            CacheValue::User(user) => Ok(user),
            other => Err(mismatch(key, &other)),
        }
    }

    /// Whether anything is stored under `key`.
    #[must_use]
    pub fn exists(&self, key: CacheKey) -> bool {
        self.inner.contains_key(&key.to_string())
    }

    /// Store a presence marker under `key`.
    pub async fn write_flag(&self, key: CacheKey) {
        self.inner.insert(key.to_string(), CacheValue::Flag).await;
    }
}

fn mismatch(key: CacheKey, found: &CacheValue) -> RepositoryError {
    RepositoryError::DataCorruption(format!(
        "cache entry {key} holds a {} value",
        found.kind()
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bakugai_core::Price;

    use super::*;

    fn summary(id: i32) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            name: format!("product {id}"),
            description: String::new(),
            image_path: format!("/images/image{id}.jpg"),
            price: Price::new(100),
        }
    }

    #[test]
    fn test_key_strings() {
        assert_eq!(CacheKey::ProductsOffset(50).to_string(), "products_offset_50");
        assert_eq!(CacheKey::Product(ProductId::new(3)).to_string(), "product_3");
        assert_eq!(CacheKey::User(UserId::new(9)).to_string(), "user_9");
        assert_eq!(
            CacheKey::UserHasProduct {
                user: UserId::new(9),
                product: ProductId::new(3),
            }
            .to_string(),
            "user_9_has_product_3"
        );
    }

    #[tokio::test]
    async fn test_populates_once() {
        let cache = StoreCache::new();
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let products = cache
                .products_at_offset(0, async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![summary(2), summary(1)])
                })
                .await
                .unwrap();
            assert_eq!(products.len(), 2);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_absent_product_is_cached() {
        let cache = StoreCache::new();

        let first = cache.product(ProductId::new(77), async { Ok(None) }).await.unwrap();
        assert!(first.is_none());

        let second = cache
            .product(ProductId::new(77), async {
                Ok(Some(Product {
                    id: ProductId::new(77),
                    name: "late".to_string(),
                    description: String::new(),
                    image_path: String::new(),
                    price: Price::new(1),
                }))
            })
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_loader_errors_are_not_cached() {
        let cache = StoreCache::new();

        let result = cache
            .user(UserId::new(1), async {
                Err(RepositoryError::DataCorruption("boom".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert!(!cache.exists(CacheKey::User(UserId::new(1))));
    }

    #[tokio::test]
    async fn test_flags() {
        let cache = StoreCache::new();
        let key = CacheKey::UserHasProduct {
            user: UserId::new(1),
            product: ProductId::new(2),
        };

        assert!(!cache.exists(key));
        cache.write_flag(key).await;
        assert!(cache.exists(key));
    }
}
