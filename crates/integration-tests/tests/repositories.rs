//! Repository queries against the seeded database.
//!
//! Run with: cargo test -p bakugai-integration-tests -- --ignored --test-threads=1

use bakugai_core::{HistoryId, ProductId, UserId};
use bakugai_integration_tests::TestContext;
use bakugai_storefront::db::{HistoryRepository, ProductRepository};
use bakugai_storefront::models::product::DESCRIPTION_PREVIEW_CHARS;
use bakugai_storefront::services::reset_to_seed;

const LONG_DESCRIPTION: &str = "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわをん\
    アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモ";

async fn insert_long_product(ctx: &TestContext, id: i32) {
    sqlx::query(
        "INSERT INTO products (id, name, description, image_path, price) \
         VALUES ($1, '長い説明の商品', $2, '', 1200) ON CONFLICT DO NOTHING",
    )
    .bind(id)
    .bind(LONG_DESCRIPTION)
    .execute(&ctx.pool)
    .await
    .unwrap();
}

fn assert_preview(description: &str) {
    let limit = usize::try_from(DESCRIPTION_PREVIEW_CHARS).unwrap();
    assert!(LONG_DESCRIPTION.chars().count() > limit);
    assert_eq!(description.chars().count(), limit);
    assert!(LONG_DESCRIPTION.starts_with(description));
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_listing_cuts_description_to_preview_length() {
    let ctx = TestContext::new().await;
    let id = ProductId::SEED_MAX + 102;
    insert_long_product(&ctx, id).await;

    let products = ProductRepository::new(&ctx.pool)
        .list_by_id_range(ProductId::new(id), ProductId::new(id))
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_preview(&products[0].description);

    let full = ProductRepository::new(&ctx.pool)
        .get_by_id(ProductId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(full.description, LONG_DESCRIPTION);

    reset_to_seed(&ctx.pool).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_purchase_list_cuts_description_to_preview_length() {
    let ctx = TestContext::new().await;
    let user = ctx.insert_user(UserId::SEED_MAX + 104).await;
    let product_id = ProductId::SEED_MAX + 103;
    insert_long_product(&ctx, product_id).await;
    sqlx::query("INSERT INTO histories (id, product_id, user_id) VALUES ($1, $2, $3)")
        .bind(HistoryId::SEED_MAX + 102)
        .bind(product_id)
        .bind(user.id.as_i32())
        .execute(&ctx.pool)
        .await
        .unwrap();

    let purchases = HistoryRepository::new(&ctx.pool)
        .recent_for_user(user.id, 30)
        .await
        .unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].product.id, ProductId::new(product_id));
    assert_preview(&purchases[0].product.description);

    reset_to_seed(&ctx.pool).await.unwrap();
}
