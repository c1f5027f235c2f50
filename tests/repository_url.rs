use chrono::{SubsecRound, Utc};
use shawty::domain::entities::UrlRecord;
use shawty::domain::errors::StoreError;
use shawty::domain::repositories::UrlStore;
use shawty::infrastructure::persistence::PgUrlStore;
use shawty::prelude::ShortenerService;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

async fn create_store(pool: PgPool, table: &str) -> PgUrlStore {
    let store = PgUrlStore::from_pool(pool, table, Duration::from_secs(5));
    store.ensure_indexes().await.unwrap();
    store
}

fn record(id: &str, url: &str) -> UrlRecord {
    UrlRecord::new(id.to_string(), url.to_string(), Utc::now().trunc_subsecs(6))
}

#[sqlx::test(migrations = false)]
async fn test_save_and_get(pool: PgPool) {
    let store = create_store(pool, "urls").await;
    let saved = record("8ffdefbd", "https://www.google.com");

    store.save(&saved).await.unwrap();
    let found = store.get_by_id("8ffdefbd").await.unwrap();

    assert_eq!(found, saved);
}

#[sqlx::test(migrations = false)]
async fn test_save_duplicate(pool: PgPool) {
    let store = create_store(pool, "urls").await;
    let first = record("7f17b0c9", "https://example.com/1548");

    store.save(&first).await.unwrap();
    let result = store.save(&record("7f17b0c9", "https://example.com/2133")).await;

    assert!(matches!(result, Err(StoreError::Duplicate { ref id }) if id == "7f17b0c9"));
    assert_eq!(store.get_by_id("7f17b0c9").await.unwrap(), first);
}

#[sqlx::test(migrations = false)]
async fn test_get_missing(pool: PgPool) {
    let store = create_store(pool, "urls").await;

    let result = store.get_by_id("deadbeef").await;

    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[sqlx::test(migrations = false)]
async fn test_ensure_indexes_is_idempotent(pool: PgPool) {
    let store = create_store(pool, "urls").await;

    assert!(store.ensure_indexes().await.is_ok());
}

#[sqlx::test(migrations = false)]
async fn test_custom_table_name(pool: PgPool) {
    let store = create_store(pool.clone(), "short_links").await;

    store
        .save(&record("5564fd6a", "https://example.org"))
        .await
        .unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = false)]
async fn test_concurrent_saves_single_winner(pool: PgPool) {
    let store = Arc::new(create_store(pool, "urls").await);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.save(&record("5564fd6a", "https://example.org")).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => successes += 1,
            Err(StoreError::Duplicate { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
}

#[sqlx::test(migrations = false)]
async fn test_resubmission_returns_stored_record(pool: PgPool) {
    let store = Arc::new(create_store(pool, "urls").await);
    let service = ShortenerService::new(store);

    let first = service.create_short_url("https://example.org").await.unwrap();
    let second = service.create_short_url("https://example.org").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        service.get_original_url(&first.id).await.unwrap(),
        "https://example.org"
    );
}

#[sqlx::test(migrations = false)]
async fn test_closed_pool_reports_io(pool: PgPool) {
    let store = create_store(pool, "urls").await;
    store.close().await;

    let result = store.get_by_id("8ffdefbd").await;

    assert!(matches!(result, Err(StoreError::Io { .. })));
}
