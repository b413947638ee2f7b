//! Integration tests for the Bakugai storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare a seeded database and start the storefront
//! cargo run -p bakugai-cli -- migrate
//! cargo run -p bakugai-cli -- seed
//! cargo run -p bakugai-storefront
//!
//! # Run integration tests (serially: several tests call `/initialize`)
//! cargo test -p bakugai-integration-tests -- --ignored --test-threads=1
//! ```
//!
//! Rows a test creates on purpose get ids above the seed thresholds, so
//! `/initialize` removes them again.
//!
//! The tests talk to the running server over HTTP and read the same database
//! (configured through `BAKUGAI_DB_*`) to check what the handlers wrote.
//! `BAKUGAI_BASE_URL` points at the server (default `http://localhost:8080`).

use bakugai_core::{Price, UserId};
use bakugai_storefront::config::DatabaseConfig;
use bakugai_storefront::db;
use reqwest::{Client, redirect};
use sqlx::PgPool;

/// Base URL for the storefront under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("BAKUGAI_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Shared state for one test: an HTTP client with a cookie store and a pool.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

/// Login credentials of a seeded user.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TestContext {
    /// Connect to the storefront database and build a client.
    ///
    /// Redirects are not followed, so tests can assert on 303 responses.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or the database is unreachable.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let config = DatabaseConfig::from_env().expect("invalid BAKUGAI_DB_* settings");
        let pool = db::create_pool(&config)
            .await
            .expect("failed to connect to the storefront database");

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            base_url: base_url(),
            pool,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A seeded user, read straight from the database.
    ///
    /// # Panics
    ///
    /// Panics if the user does not exist.
    #[allow(clippy::expect_used)]
    pub async fn seed_user(&self, id: i32) -> SeedUser {
        let (name, email, password): (String, String, String) =
            sqlx::query_as("SELECT name, email, password FROM users WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .expect("seed user missing, run `bakugai-cli seed` first");

        SeedUser {
            id: UserId::new(id),
            name,
            email,
            password,
        }
    }

    /// Log in through the form, keeping the session cookie in the client.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    #[allow(clippy::expect_used)]
    pub async fn login(&self, user: &SeedUser) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("email", &user.email), ("password", &user.password)])
            .send()
            .await
            .expect("login request failed")
    }

    /// Insert a throwaway user above the seed range and return its login.
    ///
    /// An existing row with the same id (left by an interrupted run) is reused.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    #[allow(clippy::expect_used)]
    pub async fn insert_user(&self, id: i32) -> SeedUser {
        sqlx::query(
            "INSERT INTO users (id, name, email, password) VALUES ($1, $2, $3, $4) \
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(format!("検証ユーザー{id}"))
        .bind(format!("itest{id}@example.com"))
        .bind("itest-password")
        .execute(&self.pool)
        .await
        .expect("failed to insert user");

        self.seed_user(id).await
    }

    /// Price of a product in yen.
    ///
    /// # Panics
    ///
    /// Panics if the product does not exist.
    #[allow(clippy::expect_used)]
    pub async fn product_price(&self, id: i32) -> i64 {
        let price: i32 = sqlx::query_scalar("SELECT price FROM products WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .expect("product missing");
        i64::from(price)
    }

    /// Whether `table` has a row with `id`.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    #[allow(clippy::expect_used)]
    pub async fn row_exists(&self, table: &str, id: i32) -> bool {
        sqlx::query_scalar(&format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .expect("exists query failed")
    }

    /// Number of purchases `user_id` has made of `product_id`.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    #[allow(clippy::expect_used)]
    pub async fn purchase_count(&self, user_id: i32, product_id: i32) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM histories WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }
}

/// The exact total element a user page renders for `yen`.
#[must_use]
pub fn total_element(yen: i64) -> String {
    format!("<strong class=\"total\">{}</strong>", Price::new(yen))
}

/// Read the total spend out of a rendered user page.
#[must_use]
pub fn parse_total(body: &str) -> Option<i64> {
    let open = "<strong class=\"total\">";
    let start = body.find(open)? + open.len();
    let rest = body.get(start..)?;
    let end = rest.find("</strong>")?;
    let digits: String = rest
        .get(..end)?
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_total() {
        let page = "<p>合計金額: <strong class=\"total\">12,800円</strong></p>";
        assert_eq!(parse_total(page), Some(12_800));
        assert_eq!(parse_total(&total_element(0)), Some(0));
        assert_eq!(parse_total("<p>no total</p>"), None);
    }

    #[test]
    fn test_total_element_is_exact() {
        assert_eq!(total_element(0), "<strong class=\"total\">0円</strong>");
        assert_ne!(total_element(12_800), total_element(0));
    }
}
