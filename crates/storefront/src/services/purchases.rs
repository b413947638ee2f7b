//! Purchases and purchase history.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use bakugai_core::{HistoryId, Price, ProductId, UserId};

use crate::cache::{CacheKey, StoreCache};
use crate::db::{HistoryRepository, RepositoryError, UserRepository};
use crate::models::{CurrentUser, PurchasedProduct, User};

/// Purchases shown on a user page.
pub const RECENT_PURCHASES: i64 = 30;

/// Everything the user page renders.
#[derive(Debug, Clone)]
pub struct UserPage {
    /// The profile, absent for an unknown id.
    pub user: Option<Arc<User>>,
    /// Most recent purchases, newest first.
    pub purchases: Vec<PurchasedProduct>,
    /// Total over all purchases, not only the ones listed.
    pub total_paid: Price,
}

/// Purchase operations.
pub struct PurchaseService<'a> {
    pool: &'a PgPool,
    cache: &'a StoreCache,
}

impl<'a> PurchaseService<'a> {
    /// Create a new purchase service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a StoreCache) -> Self {
        Self { pool, cache }
    }

    /// Record that `buyer` bought `product_id` now.
    ///
    /// Buying the same product again records another purchase.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn buy(
        &self,
        product_id: ProductId,
        buyer: &CurrentUser,
    ) -> Result<HistoryId, RepositoryError> {
        HistoryRepository::new(self.pool)
            .create(product_id, buyer.id, Utc::now())
            .await
    }

    /// Purchase history, total spend and profile for any user id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    pub async fn user_page(&self, user_id: UserId) -> Result<UserPage, RepositoryError> {
        let histories = HistoryRepository::new(self.pool);
        let purchases = histories.recent_for_user(user_id, RECENT_PURCHASES).await?;
        let total_paid = histories.total_paid(user_id).await?;

        let users = UserRepository::new(self.pool);
        let user = self.cache.user(user_id, users.get_by_id(user_id)).await?;

        Ok(UserPage {
            user,
            purchases,
            total_paid,
        })
    }

    /// Whether the logged-in user has bought `product_id` before.
    ///
    /// A positive answer is remembered in the cache, so once true it stays
    /// true for the life of the process. A negative answer is never cached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the count query fails.
    pub async fn already_bought(
        &self,
        current_user: Option<&CurrentUser>,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let Some(user) = current_user else {
            return Ok(false);
        };

        let key = CacheKey::UserHasProduct {
            user: user.id,
            product: product_id,
        };
        if self.cache.exists(key) {
            return Ok(true);
        }

        let count = HistoryRepository::new(self.pool)
            .count_for(product_id, user.id)
            .await?;
        if count > 0 {
            self.cache.write_flag(key).await;
            return Ok(true);
        }

        Ok(false)
    }
}
