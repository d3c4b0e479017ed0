//! Periodic cleanup of the session and enrollment ledgers.
//!
//! Each tick hard-deletes refresh tokens whose lifetime has ended and marks
//! active enrollments whose validity window closed as expired. Runs until
//! the cancellation token fires.
use crate::application::ports::ClockPort;
use crate::domain::{enrollment::EnrollmentRepository, session::RefreshTokenRepository};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

pub async fn run_retention_sweep(
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    clock: Arc<ClockPort>,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = every.as_secs(), "retention sweep started");

    let mut interval = tokio::time::interval(every);
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("retention sweep stopping");
                break;
            }
            _ = interval.tick() => {
                sweep_once(refresh_tokens.as_ref(), enrollments.as_ref(), clock.as_ref()).await
            }
        }
    }
}

/// One pass of the sweep. Failures are logged and retried on the next tick.
pub async fn sweep_once(
    refresh_tokens: &dyn RefreshTokenRepository,
    enrollments: &dyn EnrollmentRepository,
    clock: &ClockPort,
) {
    let now = clock.now();

    match refresh_tokens.delete_expired(now).await {
        Ok(0) => tracing::debug!("no expired refresh tokens to purge"),
        Ok(deleted) => tracing::info!(deleted, "purged expired refresh tokens"),
        Err(err) => tracing::error!(error = %err, "refresh token purge failed"),
    }

    match enrollments.expire_lapsed(now).await {
        Ok(0) => tracing::debug!("no lapsed enrollments"),
        Ok(expired) => tracing::info!(expired, "marked lapsed enrollments as expired"),
        Err(err) => tracing::error!(error = %err, "enrollment expiry pass failed"),
    }
}
