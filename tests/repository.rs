//! Store-level tests against an in-memory SQLite database.

use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use linksnip::db::Database;
use linksnip::errors::RepositoryError;
use linksnip::repositories::{LinkRepository, LinkRepositoryTrait};
use linksnip::retention::retention_cutoff;

async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

fn repository(pool: &SqlitePool) -> LinkRepository {
    LinkRepository::new(Database::from_pool(pool.clone()))
}

async fn insert_backdated(pool: &SqlitePool, slug: &str, url: &str, created_at: DateTime<Utc>) {
    sqlx::query("INSERT INTO links (slug, original_url, created_at) VALUES (?, ?, ?)")
        .bind(slug)
        .bind(url)
        .bind(created_at)
        .execute(pool)
        .await
        .expect("failed to insert backdated row");
}

#[tokio::test]
async fn create_then_find_round_trip() {
    let pool = test_pool().await;
    let repo = repository(&pool);

    let created = repo
        .create("abc123", "https://example.com")
        .await
        .unwrap();
    assert_eq!(created.slug, "abc123");
    assert_eq!(created.original_url, "https://example.com");

    let found = repo.find_by_slug("abc123").await.unwrap().unwrap();
    assert_eq!(found.slug, created.slug);
    assert_eq!(found.original_url, created.original_url);
    // Whole-second precision is enough; the storage round trip must not
    // move the creation time
    assert_eq!(found.created_at.timestamp(), created.created_at.timestamp());
}

#[tokio::test]
async fn find_is_exact_and_case_sensitive() {
    let pool = test_pool().await;
    let repo = repository(&pool);

    repo.create("abc123", "https://example.com").await.unwrap();

    // No prefix matching
    assert!(repo.find_by_slug("abc").await.unwrap().is_none());
    // Slugs are case-sensitive
    assert!(repo.find_by_slug("ABC123").await.unwrap().is_none());
    assert!(repo.find_by_slug("abc123").await.unwrap().is_some());
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict() {
    let pool = test_pool().await;
    let repo = repository(&pool);

    repo.create("abc123", "https://first.example").await.unwrap();

    // The store must refuse to overwrite, whatever the caller pre-checked
    let err = repo
        .create("abc123", "https://second.example")
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // The original mapping is untouched
    let found = repo.find_by_slug("abc123").await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://first.example");
}

#[tokio::test]
async fn list_all_orders_newest_first() {
    let pool = test_pool().await;
    let repo = repository(&pool);

    let now = Utc::now();
    insert_backdated(&pool, "first", "https://a.example", now - Duration::hours(3)).await;
    insert_backdated(&pool, "second", "https://b.example", now - Duration::hours(2)).await;
    insert_backdated(&pool, "third", "https://c.example", now - Duration::hours(1)).await;

    let records = repo.list_all().await.unwrap();
    let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn delete_older_than_respects_cutoff() {
    let pool = test_pool().await;
    let repo = repository(&pool);

    let now = Utc::now();
    insert_backdated(&pool, "stale", "https://old.example", now - Duration::days(8)).await;
    insert_backdated(&pool, "fresh", "https://new.example", now - Duration::days(1)).await;

    let deleted = repo.delete_older_than(retention_cutoff(now)).await.unwrap();
    assert_eq!(deleted, 1);

    assert!(repo.find_by_slug("stale").await.unwrap().is_none());
    assert!(repo.find_by_slug("fresh").await.unwrap().is_some());
}

#[tokio::test]
async fn delete_older_than_is_idempotent() {
    let pool = test_pool().await;
    let repo = repository(&pool);

    let now = Utc::now();
    insert_backdated(&pool, "stale", "https://old.example", now - Duration::days(8)).await;

    let cutoff = retention_cutoff(now);
    assert_eq!(repo.delete_older_than(cutoff).await.unwrap(), 1);
    // Re-running with the same cutoff removes nothing further
    assert_eq!(repo.delete_older_than(cutoff).await.unwrap(), 0);
    // An earlier cutoff cannot resurrect or re-delete anything either
    let earlier = cutoff - Duration::days(30);
    assert_eq!(repo.delete_older_than(earlier).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_older_than_leaves_boundary_rows() {
    let pool = test_pool().await;
    let repo = repository(&pool);

    let now = Utc::now();
    let cutoff = retention_cutoff(now);
    // Strictly-older-than: a row created exactly at the cutoff survives
    insert_backdated(&pool, "edge", "https://edge.example", cutoff).await;

    assert_eq!(repo.delete_older_than(cutoff).await.unwrap(), 0);
    assert!(repo.find_by_slug("edge").await.unwrap().is_some());
}
