//! [`SwapResult`]: the outbound side of a swap, mutated by Builder/Signer/Stabilizer/Replacer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::key::SwapKey;
use crate::status::ResultStatus;

/// The outbound side of an accepted swap (§3.2).
///
/// Created once by the Verifier alongside the request's `Verified` transition
/// ([`ResultStatus::MatchEmpty`]); every later field update is a conditional, CAS-guarded
/// mutation performed by exactly one of Builder/Signer, Stabilizer, or Replacer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapResult {
    pub key: SwapKey,
    pub to_chain_id: u64,
    pub pair_id: String,
    pub recipient: String,
    pub value: Decimal,
    /// Assigned once at creation time by the Swap-Out driver; never rewritten afterwards
    /// (invariant 2).
    pub nonce: u64,
    /// The current canonical outbound tx hash. Empty until the Signer/Broadcaster fills it.
    pub swap_tx: String,
    /// Every outbound hash ever broadcast for this result, including `swap_tx` (invariant 3).
    pub old_swap_txs: Vec<String>,
    /// Destination-chain block height at which the canonical tx was observed; `0` means
    /// "not yet observed" (invariant 4).
    pub swap_height: u64,
    /// Unix seconds at which the canonical tx was first observed on-chain.
    pub swap_time: i64,
    pub status: ResultStatus,
    /// Unix seconds at which this result row was created (used by the Replacer's wait-time
    /// check and the Stabilizer/Replacer's lifetime horizon).
    pub timestamp: i64,
    pub memo: Option<String>,
}

impl SwapResult {
    /// Constructs the initial row a Verifier acceptance creates: no outbound tx yet.
    pub fn new_match_empty(
        key: SwapKey,
        to_chain_id: u64,
        pair_id: impl Into<String>,
        recipient: impl Into<String>,
        value: Decimal,
        nonce: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            key,
            to_chain_id,
            pair_id: pair_id.into(),
            recipient: recipient.into(),
            value,
            nonce,
            swap_tx: String::new(),
            old_swap_txs: Vec::new(),
            swap_height: 0,
            swap_time: 0,
            status: ResultStatus::MatchEmpty,
            timestamp,
            memo: None,
        }
    }

    /// The set of hashes that might still win on-chain: the canonical one plus every
    /// replacement, each considered at most once (invariant 3).
    pub fn all_swap_txs(&self) -> Vec<&str> {
        let mut txs = Vec::with_capacity(self.old_swap_txs.len() + 1);
        if !self.swap_tx.is_empty() {
            txs.push(self.swap_tx.as_str());
        }
        for tx in &self.old_swap_txs {
            if tx != &self.swap_tx {
                txs.push(tx.as_str());
            }
        }
        txs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SwapKey {
        SwapKey::new(1, "0xabc", 0)
    }

    #[test]
    fn all_swap_txs_dedupes_canonical_against_old() {
        let mut result = SwapResult::new_match_empty(key(), 2, "p", "r", Decimal::ONE, 7, 0);
        result.swap_tx = "h2".into();
        result.old_swap_txs = vec!["h1".into(), "h2".into()];
        assert_eq!(result.all_swap_txs(), vec!["h2", "h1"]);
    }

    #[test]
    fn all_swap_txs_empty_when_not_yet_broadcast() {
        let result = SwapResult::new_match_empty(key(), 2, "p", "r", Decimal::ONE, 7, 0);
        assert!(result.all_swap_txs().is_empty());
    }
}
