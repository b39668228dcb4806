//! Hourly sweep that deletes dead session rows.
//!
//! Logout revokes `user_sessions` rows and refresh rotation expires them,
//! but nothing else removes them; left alone the table only grows. This
//! job deletes every expired or revoked row once per [`SWEEP_INTERVAL`].

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use vicinity_db::repositories::SessionRepo;

/// Time between sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Loop until `cancel` fires, sweeping on every interval tick.
///
/// The first tick of [`tokio::time::interval`] completes immediately, so a
/// restart also clears whatever accumulated while the server was down.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Session sweep running"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweep stopped");
                break;
            }
            _ = ticker.tick() => sweep(&pool).await,
        }
    }
}

async fn sweep(pool: &PgPool) {
    match SessionRepo::cleanup_expired(pool).await {
        Ok(0) => tracing::debug!("Session sweep found nothing to delete"),
        Ok(deleted) => tracing::info!(deleted, "Session sweep deleted dead sessions"),
        Err(e) => tracing::error!(error = %e, "Session sweep failed"),
    }
}
