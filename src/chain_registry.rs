//! Per-destination-chain `Bridge`/`MpcSigner` handles, keyed by chain id (§6.1, "a provider
//! registry keyed by chain id").
//!
//! Concrete `Bridge`/`MpcSigner` implementations — the chain RPC client and the MPC client —
//! are out of scope for this crate (§1); this registry is the extension point a deployment
//! wires real ones into via [`ChainRegistry::register`]. A chain present in [`Config`](crate::config::Config)
//! but absent here is skipped at startup with a logged [`BridgeError::NoBridgeForChainId`].

use std::sync::Arc;

use dashmap::DashMap;
use router_types::{Bridge, BridgeError, MpcSigner};

/// The `Bridge`/`MpcSigner` pair this process drives one destination chain through.
#[derive(Clone)]
pub struct ChainHandle {
    pub bridge: Arc<dyn Bridge>,
    pub signer: Arc<dyn MpcSigner>,
}

#[derive(Default)]
pub struct ChainRegistry {
    chains: DashMap<u64, ChainHandle>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, chain_id: u64, bridge: Arc<dyn Bridge>, signer: Arc<dyn MpcSigner>) {
        self.chains.insert(chain_id, ChainHandle { bridge, signer });
    }

    pub fn get(&self, chain_id: u64) -> Result<ChainHandle, BridgeError> {
        self.chains.get(&chain_id).map(|entry| entry.clone()).ok_or(BridgeError::NoBridgeForChainId(chain_id))
    }
}
