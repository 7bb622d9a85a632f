//! The MPC/threshold signer capability (§6.2). Out of scope to implement; the core only holds
//! a handle to this trait.

use async_trait::async_trait;

/// A signed transaction ready to broadcast, plus the canonical hash the chain will compute upon
/// inclusion. The hash must be known *before* broadcasting (§4.4 ordering).
#[derive(Debug, Clone)]
pub struct SignedTx {
    pub signed: Vec<u8>,
    pub tx_hash: String,
}

#[derive(Debug, thiserror::Error)]
#[error("mpc signing failed: {0}")]
pub struct MpcError(pub String);

/// The distributed threshold signer the Signer/Broadcaster delegates to (§6.2). Synchronous
/// from the caller's standpoint even though a real implementation may take seconds — callers
/// must treat this as a potentially slow, cancellable I/O boundary (§5 suspension points).
#[async_trait]
pub trait MpcSigner: Send + Sync {
    async fn sign(&self, raw_tx: &[u8]) -> Result<SignedTx, MpcError>;
}
