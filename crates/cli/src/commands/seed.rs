//! Generate benchmark data.
//!
//! Rows get explicit ids starting at 1, so a default run fills exactly the
//! ranges that `initialize` preserves. The generator is seeded, and the same
//! seed and plan always produce the same rows.
//!
//! # Usage
//!
//! ```bash
//! bakugai-cli seed
//! bakugai-cli seed --users 50 --products 200 --comments 1000 --histories 2000 --seed 7
//! ```

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, Utc};
use rand::distr::{Alphanumeric, SampleString};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use sqlx::PgPool;
use tracing::info;

use super::{CommandError, connect};

/// Rows per `INSERT ... UNNEST` statement.
const CHUNK_SIZE: i32 = 5_000;

/// Comments and purchases are spread over this many days before now.
const HISTORY_DAYS: i64 = 365;

const FAMILY_NAMES: &[&str] = &[
    "佐藤", "鈴木", "高橋", "田中", "伊藤", "渡辺", "山本", "中村", "小林", "加藤",
];
const GIVEN_NAMES: &[&str] = &[
    "太郎", "花子", "翔太", "美咲", "大輔", "陽菜", "健一", "さくら", "拓海", "結衣",
];
const ADJECTIVES: &[&str] = &["特選", "限定", "お徳用", "高級", "手作り", "北海道産", "新作"];
const NOUNS: &[&str] = &["緑茶", "カレー", "タオル", "腕時計", "スニーカー", "ノート", "米"];
const SENTENCES: &[&str] = &[
    "毎日の暮らしにぴったりの一品です。",
    "こだわりの素材だけを使って仕上げました。",
    "贈り物にも自分へのご褒美にもおすすめです。",
    "売り切れ必至の人気商品です。",
    "職人が一つひとつ丁寧に作っています。",
];
const COMMENTS: &[&str] = &[
    "最高でした！",
    "リピート決定です。",
    "思ったより小さかったです。",
    "家族にも好評でした。",
    "値段の割に品質が良いと思います。",
    "もう一つ買います。",
];

/// How many rows to generate per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub users: i32,
    pub products: i32,
    pub comments: i32,
    pub histories: i32,
}

impl SeedPlan {
    /// Check that the counts are usable.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidPlan` for negative counts, or when
    /// comments or histories are requested without users and products to
    /// point at.
    pub fn validate(&self) -> Result<(), CommandError> {
        for (table, count) in [
            ("users", self.users),
            ("products", self.products),
            ("comments", self.comments),
            ("histories", self.histories),
        ] {
            if count < 0 {
                return Err(CommandError::InvalidPlan(format!(
                    "{table} count must not be negative (got {count})"
                )));
            }
        }

        let needs_references = self.comments > 0 || self.histories > 0;
        if needs_references && (self.users == 0 || self.products == 0) {
            return Err(CommandError::InvalidPlan(
                "comments and histories need at least one user and one product".to_string(),
            ));
        }
        Ok(())
    }
}

/// Seed an empty database.
///
/// # Errors
///
/// Returns `CommandError` if the plan is invalid, the database is unreachable
/// or an insert fails (for example because the tables already hold rows).
pub async fn run(plan: SeedPlan, seed: u64) -> Result<(), CommandError> {
    plan.validate()?;

    let pool = connect().await?;
    let mut rng = StdRng::seed_from_u64(seed);
    let now = Utc::now();

    info!(?plan, seed, "Starting seeding process");

    for range in chunks(plan.users) {
        insert_users(&pool, &generate_users(range, &mut rng)).await?;
    }
    info!("  Users inserted: {}", plan.users);

    for range in chunks(plan.products) {
        insert_products(&pool, &generate_products(range, &mut rng)).await?;
    }
    info!("  Products inserted: {}", plan.products);

    for range in chunks(plan.comments) {
        let rows = generate_comments(range, plan, now, &mut rng);
        insert_comments(&pool, &rows).await?;
    }
    info!("  Comments inserted: {}", plan.comments);

    for range in chunks(plan.histories) {
        let rows = generate_histories(range, plan, now, &mut rng);
        insert_histories(&pool, &rows).await?;
    }
    info!("  Histories inserted: {}", plan.histories);

    reset_sequences(&pool).await?;
    info!("Seeding complete!");
    Ok(())
}

/// Split `1..=total` into ranges of at most [`CHUNK_SIZE`] ids.
fn chunks(total: i32) -> impl Iterator<Item = RangeInclusive<i32>> {
    (0..total.max(0))
        .step_by(usize::try_from(CHUNK_SIZE).unwrap_or(1))
        .map(move |start| (start + 1)..=start.saturating_add(CHUNK_SIZE).min(total))
}

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn random_past(rng: &mut impl Rng, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(rng.random_range(0..HISTORY_DAYS * 24 * 60 * 60))
}

// =============================================================================
// Row generation
// =============================================================================

#[derive(Debug, Default, PartialEq, Eq)]
struct UserColumns {
    ids: Vec<i32>,
    names: Vec<String>,
    emails: Vec<String>,
    passwords: Vec<String>,
}

fn generate_users(range: RangeInclusive<i32>, rng: &mut impl Rng) -> UserColumns {
    let mut rows = UserColumns::default();
    for id in range {
        rows.ids.push(id);
        rows.names
            .push(format!("{} {}", pick(rng, FAMILY_NAMES), pick(rng, GIVEN_NAMES)));
        rows.emails.push(format!("user{id}@example.com"));
        rows.passwords.push(Alphanumeric.sample_string(rng, 12));
    }
    rows
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ProductColumns {
    ids: Vec<i32>,
    names: Vec<String>,
    descriptions: Vec<String>,
    image_paths: Vec<String>,
    prices: Vec<i32>,
}

fn generate_products(range: RangeInclusive<i32>, rng: &mut impl Rng) -> ProductColumns {
    let mut rows = ProductColumns::default();
    for id in range {
        rows.ids.push(id);
        rows.names.push(format!(
            "{}{} No.{id}",
            pick(rng, ADJECTIVES),
            pick(rng, NOUNS)
        ));

        let sentences = rng.random_range(2..=5);
        let description: String = (0..sentences).map(|_| pick(rng, SENTENCES)).collect();
        rows.descriptions.push(description);

        rows.image_paths.push(format!("/images/image{}.jpg", id % 100));
        rows.prices.push(rng.random_range(1..=500) * 100);
    }
    rows
}

/// Comments and histories share a shape: who, what and when.
#[derive(Debug, Default, PartialEq, Eq)]
struct ActivityColumns {
    ids: Vec<i32>,
    product_ids: Vec<i32>,
    user_ids: Vec<i32>,
    contents: Vec<String>,
    created_ats: Vec<DateTime<Utc>>,
}

impl ActivityColumns {
    fn push(&mut self, id: i32, plan: SeedPlan, now: DateTime<Utc>, rng: &mut impl Rng) {
        self.ids.push(id);
        self.product_ids.push(rng.random_range(1..=plan.products));
        self.user_ids.push(rng.random_range(1..=plan.users));
        self.created_ats.push(random_past(rng, now));
    }
}

fn generate_comments(
    range: RangeInclusive<i32>,
    plan: SeedPlan,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> ActivityColumns {
    let mut rows = ActivityColumns::default();
    for id in range {
        rows.push(id, plan, now, rng);
        rows.contents.push(pick(rng, COMMENTS).to_string());
    }
    rows
}

fn generate_histories(
    range: RangeInclusive<i32>,
    plan: SeedPlan,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> ActivityColumns {
    let mut rows = ActivityColumns::default();
    for id in range {
        rows.push(id, plan, now, rng);
    }
    rows
}

// =============================================================================
// Inserts
// =============================================================================

async fn insert_users(pool: &PgPool, rows: &UserColumns) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO users (id, name, email, password)
        SELECT * FROM UNNEST($1::int4[], $2::text[], $3::text[], $4::text[])
        ",
    )
    .bind(&rows.ids)
    .bind(&rows.names)
    .bind(&rows.emails)
    .bind(&rows.passwords)
    .execute(pool)
    .await?;
    Ok(())
}

async fn insert_products(pool: &PgPool, rows: &ProductColumns) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO products (id, name, description, image_path, price)
        SELECT * FROM UNNEST($1::int4[], $2::text[], $3::text[], $4::text[], $5::int4[])
        ",
    )
    .bind(&rows.ids)
    .bind(&rows.names)
    .bind(&rows.descriptions)
    .bind(&rows.image_paths)
    .bind(&rows.prices)
    .execute(pool)
    .await?;
    Ok(())
}

async fn insert_comments(pool: &PgPool, rows: &ActivityColumns) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO comments (id, product_id, user_id, content, created_at)
        SELECT * FROM UNNEST($1::int4[], $2::int4[], $3::int4[], $4::text[], $5::timestamptz[])
        ",
    )
    .bind(&rows.ids)
    .bind(&rows.product_ids)
    .bind(&rows.user_ids)
    .bind(&rows.contents)
    .bind(&rows.created_ats)
    .execute(pool)
    .await?;
    Ok(())
}

async fn insert_histories(pool: &PgPool, rows: &ActivityColumns) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO histories (id, product_id, user_id, created_at)
        SELECT * FROM UNNEST($1::int4[], $2::int4[], $3::int4[], $4::timestamptz[])
        ",
    )
    .bind(&rows.ids)
    .bind(&rows.product_ids)
    .bind(&rows.user_ids)
    .bind(&rows.created_ats)
    .execute(pool)
    .await?;
    Ok(())
}

/// Point each id sequence past the explicit ids written above.
async fn reset_sequences(pool: &PgPool) -> Result<(), sqlx::Error> {
    for table in ["users", "products", "comments", "histories"] {
        sqlx::query(&format!(
            "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
             (SELECT COALESCE(MAX(id), 0) + 1 FROM {table}), false)"
        ))
        .execute(pool)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn plan() -> SeedPlan {
        SeedPlan {
            users: 20,
            products: 30,
            comments: 100,
            histories: 100,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_chunks_cover_every_id_once() {
        let ranges: Vec<_> = chunks(12_001).collect();
        assert_eq!(ranges, vec![1..=5_000, 5_001..=10_000, 10_001..=12_001]);
        assert_eq!(chunks(0).count(), 0);
    }

    #[test]
    fn test_chunks_near_i32_max_do_not_overflow() {
        let last = chunks(i32::MAX).last().unwrap();
        assert_eq!(last, 2_147_480_001..=i32::MAX);
    }

    #[test]
    fn test_users_have_dense_ids_and_unique_emails() {
        let mut rng = StdRng::seed_from_u64(1);
        let users = generate_users(1..=50, &mut rng);

        assert_eq!(users.ids, (1..=50).collect::<Vec<_>>());
        let emails: HashSet<_> = users.emails.iter().collect();
        assert_eq!(emails.len(), 50);
        assert!(users.passwords.iter().all(|p| p.len() == 12));
    }

    #[test]
    fn test_same_seed_same_rows() {
        let a = generate_products(1..=10, &mut StdRng::seed_from_u64(42));
        let b = generate_products(1..=10, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_products_have_positive_prices() {
        let products = generate_products(1..=100, &mut StdRng::seed_from_u64(3));
        assert!(products.prices.iter().all(|&p| p >= 100 && p % 100 == 0));
        assert!(products.descriptions.iter().all(|d| !d.is_empty()));
    }

    #[test]
    fn test_activity_references_seeded_rows() {
        let mut rng = StdRng::seed_from_u64(9);
        let histories = generate_histories(1..=100, plan(), fixed_now(), &mut rng);

        assert!(histories.product_ids.iter().all(|id| (1..=30).contains(id)));
        assert!(histories.user_ids.iter().all(|id| (1..=20).contains(id)));
        assert!(histories.created_ats.iter().all(|t| *t <= fixed_now()));
        assert!(histories.contents.is_empty());
    }

    #[test]
    fn test_comments_have_content() {
        let mut rng = StdRng::seed_from_u64(9);
        let comments = generate_comments(1..=10, plan(), fixed_now(), &mut rng);
        assert_eq!(comments.contents.len(), 10);
    }

    #[test]
    fn test_plan_validation() {
        assert!(plan().validate().is_ok());
        assert!(
            SeedPlan {
                users: -1,
                ..plan()
            }
            .validate()
            .is_err()
        );
        assert!(
            SeedPlan {
                products: 0,
                ..plan()
            }
            .validate()
            .is_err()
        );
        assert!(
            SeedPlan {
                users: 0,
                products: 0,
                comments: 0,
                histories: 0,
            }
            .validate()
            .is_ok()
        );
    }
}
