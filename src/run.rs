//! Wires the four pipeline jobs (§4) for every configured, registered destination chain, and
//! drives them as cancellable, independently-paced tasks (§5 "jobs as tasks, not eternal loops").

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use router_core::{run_job, GasPriceTracker, NonceLocks, Replacer, Stabilizer, SwapOutDriver, Verifier};
use router_store::SwapStore;
use router_types::BlacklistPolicy;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::chain_registry::ChainRegistry;
use crate::config::Config;
use crate::metrics::Metrics;

fn now_unix() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock is after the unix epoch").as_secs() as i64
}

/// Spawns every job for every chain present in both `config` and `registry`, returning the
/// tracker the caller awaits at shutdown. A configured chain absent from `registry` is skipped
/// with a warning rather than failing the whole process (§1, chain RPC clients are a pluggable,
/// out-of-scope collaborator).
pub fn spawn_jobs<S, P>(
    config: &Config,
    registry: &ChainRegistry,
    store: Arc<S>,
    policy: Arc<P>,
    metrics: Arc<Metrics>,
    cancel: CancellationToken,
) -> TaskTracker
where
    S: SwapStore + Send + Sync + 'static,
    P: BlacklistPolicy + 'static,
{
    let tracker = TaskTracker::new();
    let nonce_locks = Arc::new(NonceLocks::new());

    for entry in &config.chains {
        let chain_id = entry.chain.chain_id;
        let handle = match registry.get(chain_id) {
            Ok(handle) => handle,
            Err(err) => {
                tracing::warn!(chain_id, %err, "skipping chain: no bridge registered for it");
                continue;
            }
        };
        let gas_tracker = Arc::new(GasPriceTracker::new());

        let verifier = Arc::new(Verifier::new(
            store.clone(),
            handle.bridge.clone(),
            policy.clone(),
            nonce_locks.clone(),
            entry.verify.horizon_secs,
        ));
        let verifier_metrics = metrics.clone();
        let verifier_cancel = cancel.clone();
        let verifier_interval = std::time::Duration::from_secs(entry.verify.interval_secs);
        tracker.spawn(async move {
            run_job("verify", verifier_interval, verifier_cancel, move || {
                let verifier = verifier.clone();
                let metrics = verifier_metrics.clone();
                async move {
                    verifier.run_pass(now_unix()).await;
                    metrics.job_passes.with_label_values(&["verify", &chain_id.to_string()]).inc();
                }
            })
            .await;
        });

        let swap_out = Arc::new(SwapOutDriver::new(
            store.clone(),
            handle.bridge.clone(),
            handle.signer.clone(),
            gas_tracker.clone(),
            entry.swap_out.horizon_secs,
        ));
        let swap_out_metrics = metrics.clone();
        let swap_out_cancel = cancel.clone();
        let swap_out_interval = std::time::Duration::from_secs(entry.swap_out.interval_secs);
        tracker.spawn(async move {
            run_job("swap-out", swap_out_interval, swap_out_cancel, move || {
                let swap_out = swap_out.clone();
                let metrics = swap_out_metrics.clone();
                async move {
                    swap_out.run_pass(now_unix()).await;
                    metrics.job_passes.with_label_values(&["swap-out", &chain_id.to_string()]).inc();
                }
            })
            .await;
        });

        let stabilizer = Arc::new(Stabilizer::new(store.clone(), handle.bridge.clone(), entry.stabilize.horizon_secs));
        let stabilizer_metrics = metrics.clone();
        let stabilizer_cancel = cancel.clone();
        let stabilizer_interval = std::time::Duration::from_secs(entry.stabilize.interval_secs);
        tracker.spawn(async move {
            run_job("stabilize", stabilizer_interval, stabilizer_cancel, move || {
                let stabilizer = stabilizer.clone();
                let metrics = stabilizer_metrics.clone();
                async move {
                    stabilizer.run_pass(now_unix()).await;
                    metrics.job_passes.with_label_values(&["stabilize", &chain_id.to_string()]).inc();
                }
            })
            .await;
        });

        let replacer = Arc::new(Replacer::new(store.clone(), handle.bridge.clone(), handle.signer.clone(), gas_tracker.clone()));
        let replacer_metrics = metrics.clone();
        let replacer_cancel = cancel.clone();
        let replacer_interval = std::time::Duration::from_secs(entry.replace.interval_secs);
        tracker.spawn(async move {
            run_job("replace", replacer_interval, replacer_cancel, move || {
                let replacer = replacer.clone();
                let metrics = replacer_metrics.clone();
                async move {
                    replacer.run_pass(now_unix()).await;
                    metrics.job_passes.with_label_values(&["replace", &chain_id.to_string()]).inc();
                }
            })
            .await;
        });

        tracing::info!(chain_id, "jobs started for chain");
    }

    tracker.close();
    tracker
}
