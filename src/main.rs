use std::sync::Arc;

use router_relayer::blacklist::ConfigBlacklistPolicy;
use router_relayer::chain_registry::ChainRegistry;
use router_relayer::config::Config;
use router_relayer::metrics::Metrics;
use router_relayer::sig_down::SigDown;
use router_relayer::run;
use router_store::InMemorySwapStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    router_relayer::logging::init();

    let config = Config::load()?;
    let metrics = Arc::new(Metrics::new());
    let store = Arc::new(InMemorySwapStore::new());
    let policy = Arc::new(ConfigBlacklistPolicy::from_config(&config));

    // Concrete chain RPC and MPC clients are a deployment's own collaborators (see
    // `chain_registry`); this binary starts with none registered and simply skips every
    // configured chain until they're wired in.
    let registry = ChainRegistry::new();

    let sig_down = SigDown::try_new()?;
    let cancel = sig_down.cancellation_token();

    tracing::info!(chains = config.chains.len(), "router-relayer starting");
    let jobs = run::spawn_jobs(&config, &registry, store, policy, metrics, cancel);

    sig_down.wait_for_tasks().await;
    jobs.wait().await;

    tracing::info!("router-relayer shut down cleanly");
    Ok(())
}
