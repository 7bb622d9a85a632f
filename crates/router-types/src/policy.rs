//! The blacklist policy capability (§4.1 policy step 1). Out of scope to implement (§1); the
//! core only holds a handle to this trait, the same way it holds `Bridge`/`MpcSigner`.

/// A synchronous, process-wide lookup over `(fromChainID, toChainID, tokenID)` triples. Real
/// implementations back this with a config file or admin-managed table; no I/O is expected here,
/// so the Verifier consults it before ever calling out to a bridge.
pub trait BlacklistPolicy: Send + Sync {
    fn is_blacklisted(&self, from_chain_id: u64, to_chain_id: u64, token_id: &str) -> bool;
}
