use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sqlx::migrate::MigrateDatabase;
use sqlx::{
    sqlite::{SqlitePool, SqlitePoolOptions},
    Sqlite,
};
use thiserror::Error;

use crate::config::DatabaseConfig;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    #[error("Failed to create database: {0}")]
    DatabaseCreationFailed(String),
}

pub type DbResult<T> = Result<T, DatabaseError>;

/// Represents an established database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

/// Database health status
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DbHealthStatus {
    Healthy,
    Unhealthy,
}

/// Complete database health check result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseHealth {
    pub status: DbHealthStatus,
    pub response_time_ms: u64,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqlite_version: Option<String>,
}

impl Database {
    /// Create a new database connection pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!("Initializing database connection");
        debug!(
            "Database configuration: max_conn={}, min_conn={}, timeout={}s",
            config.max_connections, config.min_connections, config.connect_timeout_seconds
        );

        // First, make sure the database file exists
        Self::ensure_database_exists(config).await?;

        // Create the connection pool
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                DatabaseError::ConnectionError(e)
            })?;

        info!("Successfully connected to database at {}", config.url);

        // Run migrations if enabled
        if config.use_migrations {
            Self::run_migrations(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Wrap an already-established pool. Used by tests running against an
    /// in-memory database.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> DatabaseHealth {
        // Measure query execution time
        let start = std::time::Instant::now();

        // Try a simple query to verify the connection is working
        let result = sqlx::query("SELECT 1").fetch_one(self.get_pool()).await;

        let elapsed = start.elapsed();

        match result {
            Ok(_) => {
                let sqlite_version =
                    sqlx::query_scalar::<_, String>("SELECT sqlite_version()")
                        .fetch_one(self.get_pool())
                        .await
                        .ok();

                DatabaseHealth {
                    status: DbHealthStatus::Healthy,
                    response_time_ms: elapsed.as_millis() as u64,
                    message: None,
                    sqlite_version,
                }
            }
            Err(e) => DatabaseHealth {
                status: DbHealthStatus::Unhealthy,
                response_time_ms: elapsed.as_millis() as u64,
                message: Some(format!("Database query failed: {}", e)),
                sqlite_version: None,
            },
        }
    }

    /// Ensure the target database file exists, create it if necessary
    async fn ensure_database_exists(config: &DatabaseConfig) -> DbResult<()> {
        let url = &config.url;

        debug!("Checking if database '{}' exists", url);

        let db_exists = Sqlite::database_exists(url)
            .await
            .map_err(DatabaseError::ConnectionError)?;

        if !db_exists {
            if config.create_database_if_missing {
                info!("Database '{}' does not exist, creating it", url);

                if let Err(err) = Sqlite::create_database(url).await {
                    return Err(DatabaseError::DatabaseCreationFailed(format!(
                        "Failed to create database '{}': {}",
                        url, err
                    )));
                }

                info!("Successfully created database '{}'", url);
            } else {
                return Err(DatabaseError::DatabaseNotFound(format!(
                    "Database '{}' does not exist",
                    url
                )));
            }
        } else {
            debug!("Database '{}' exists", url);
        }

        Ok(())
    }

    /// Run database migrations
    async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
        info!("Running database migrations");

        match sqlx::migrate!("./migrations").run(pool).await {
            Ok(_) => {
                info!("Database migrations completed successfully");
                Ok(())
            }
            Err(e) => {
                warn!("Database migration error: {}", e);
                Err(DatabaseError::MigrationError(e.to_string()))
            }
        }
    }

    /// Gracefully close the database connection pool
    pub async fn shutdown(&self) {
        info!("Shutting down database connection pool...");

        // Get current connection count for reporting
        let used_connections = self.pool.size();
        let idle_connections = self.pool.num_idle();

        // Close the connection pool
        self.pool.close().await;

        info!(
            "Database connection pool closed. Stats: {} active, {} idle connections released",
            used_connections, idle_connections
        );
    }
}
