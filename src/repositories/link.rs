// src/repositories/link.rs - Data access
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqlitePool;

use crate::db::Database;
use crate::errors::RepositoryError;
use crate::models::Link;

type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepositoryTrait: Send + Sync {
    /// Inserts a new link with `created_at` set to the current time.
    ///
    /// ### Arguments
    /// * `slug` - The unique slug for the new link
    /// * `original_url` - The redirect target, stored verbatim
    ///
    /// ### Returns
    /// * `Result<Link>` - The stored record on success
    ///
    /// ### Errors
    /// * `RepositoryError::Conflict` - If the slug is already taken. The
    ///   store never silently overwrites; concurrent creators racing on the
    ///   same slug are arbitrated by the unique constraint.
    /// * `RepositoryError::Database` - If a database error occurs
    async fn create(&self, slug: &str, original_url: &str) -> Result<Link>;

    /// Finds a link by its slug. Exact match only, no prefix matching.
    ///
    /// ### Returns
    /// * `Result<Option<Link>>` - The link if found, or `None` if not found
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>>;

    /// Returns all links ordered by creation time, newest first.
    ///
    /// A full scan with no pagination; acceptable at this service's scale.
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    async fn list_all(&self) -> Result<Vec<Link>>;

    /// Deletes every link created before `cutoff` and returns the count.
    ///
    /// Idempotent: re-running with the same or an earlier cutoff removes
    /// zero additional rows.
    ///
    /// ### Errors
    /// * `RepositoryError::Database` - If a database error occurs
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

// Implementation using the SQLite database
pub struct LinkRepository {
    pool: SqlitePool,
}

impl LinkRepository {
    pub fn new(db: Database) -> Self {
        Self {
            pool: db.get_pool().clone(),
        }
    }
}

#[async_trait]
impl LinkRepositoryTrait for LinkRepository {
    async fn create(&self, slug: &str, original_url: &str) -> Result<Link> {
        let created_at = Utc::now();

        // Single-statement insert; SQLite's own transactional guarantee is
        // all the locking this needs. A duplicate slug trips the primary
        // key constraint, which From<sqlx::Error> maps to Conflict.
        sqlx::query("INSERT INTO links (slug, original_url, created_at) VALUES (?, ?, ?)")
            .bind(slug)
            .bind(original_url)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                debug!("Failed to insert link '{}': {}", slug, e);
                RepositoryError::from(e)
            })?;

        Ok(Link {
            slug: slug.to_string(),
            original_url: original_url.to_string(),
            created_at,
        })
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        sqlx::query_as::<_, Link>(
            "SELECT slug, original_url, created_at FROM links WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }

    async fn list_all(&self) -> Result<Vec<Link>> {
        // created_at is stored in a lexicographically ordered text format,
        // so a plain ORDER BY sorts chronologically
        sqlx::query_as::<_, Link>(
            "SELECT slug, original_url, created_at FROM links ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM links WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(result.rows_affected())
    }
}
