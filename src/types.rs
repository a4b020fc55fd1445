use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::db::{Database, DatabaseHealth};
use crate::errors::AppError;

// Result type used by route handlers
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub db_health: DatabaseHealth,
    pub uptime_seconds: u64,
}

// Define an AppState struct to hold shared application state
pub struct AppState {
    pub start_time: Instant,
    pub db: Database,
    pub version: String,
}
