//! Minimal `prometheus`-backed metrics registry (§2.1 ambient stack).
//!
//! The HTTP endpoint that would export this registry is out of scope (§1, "the JSON-RPC
//! admin/query API"); the registry itself and its update call sites are in scope.

use prometheus::{IntCounterVec, Opts, Registry};

pub struct Metrics {
    registry: Registry,
    /// One counter per (job, chain_id), incremented once per completed pass.
    pub job_passes: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let job_passes = IntCounterVec::new(
            Opts::new("router_relayer_job_passes_total", "Completed passes per job per chain"),
            &["job", "chain_id"],
        )
        .expect("metric options are valid");

        registry.register(Box::new(job_passes.clone())).expect("metric registers exactly once");

        Self { registry, job_passes }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
