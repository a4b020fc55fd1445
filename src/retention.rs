//! Daily retention sweep.
//!
//! Links older than the retention window are deleted once a day by a
//! background task. The task is owned by the server lifecycle: spawned
//! once during startup, stopped on graceful shutdown, and it talks to the
//! store exclusively through the repository's public operations.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{error, info};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::repositories::LinkRepositoryTrait;

/// How long a link is kept before the sweep removes it.
pub const RETENTION_DAYS: i64 = 7;

/// How often the sweep runs. Fixed, not runtime-configurable.
const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cutoff for a sweep running at `now`: everything created before it is
/// past the retention window.
pub fn retention_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - chrono::Duration::days(RETENTION_DAYS)
}

/// Handle to the running sweep task
pub struct RetentionSweeper {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RetentionSweeper {
    /// Spawns the sweep loop. Sweep failures are logged and swallowed; the
    /// next scheduled firing is the retry.
    pub fn spawn<T>(repository: Arc<T>) -> Self
    where
        T: LinkRepositoryTrait + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            info!(
                "Retention sweeper started: {}-day window, sweeping every {}s",
                RETENTION_DAYS,
                SWEEP_INTERVAL.as_secs()
            );

            loop {
                tokio::select! {
                    _ = sleep(SWEEP_INTERVAL) => {
                        let cutoff = retention_cutoff(Utc::now());
                        match repository.delete_older_than(cutoff).await {
                            Ok(count) => info!("Retention sweep removed {} expired links", count),
                            Err(e) => error!("Retention sweep failed: {}", e),
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }

            info!("Retention sweeper stopped");
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signals the sweep loop to stop and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}
