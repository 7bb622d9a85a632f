//! Generic pacing/cancellation harness shared by every pipeline job (§5, "jobs as tasks, not
//! eternal loops").

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Drives `pass` on a fixed interval until `cancel` fires. Cancellation is observed only at the
/// boundary between passes, never mid-record, so no record is left half-updated (§5).
pub async fn run_job<F, Fut>(name: &'static str, interval: Duration, cancel: CancellationToken, mut pass: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tracing::info!(job = name, interval_secs = interval.as_secs(), "starting job");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(job = name, "job cancelled, shutting down");
                return;
            }
            _ = ticker.tick() => {
                pass().await;
            }
        }
    }
}
