//! The Stabilizer (§4.5): canonical tx selection, two-phase promotion, and failure detection.

use std::sync::Arc;

use router_store::{MatchTx, SwapStore};
use router_types::{Bridge, ResultStatus, SwapKey, SwapResult, TxStatus};

pub struct Stabilizer<S, B> {
    store: Arc<S>,
    bridge: Arc<B>,
    /// Results younger than `now - horizon_secs` are examined (§4.5 "the stable horizon").
    horizon_secs: i64,
}

impl<S, B> Stabilizer<S, B>
where
    S: SwapStore,
    B: Bridge + ?Sized,
{
    pub fn new(store: Arc<S>, bridge: Arc<B>, horizon_secs: i64) -> Self {
        Self {
            store,
            bridge,
            horizon_secs,
        }
    }

    pub async fn run_pass(&self, now: i64) {
        let min_timestamp = now - self.horizon_secs;
        let results = self
            .store
            .find_router_swap_results_with_status(ResultStatus::MatchTxNotStable, min_timestamp)
            .await;
        for result in results {
            self.stabilize_one(result).await;
        }
    }

    async fn stabilize_one(&self, result: SwapResult) {
        let Some((winning_hash, status)) = self.probe_on_chain_hash(&result).await else {
            return;
        };

        if result.swap_height == 0 {
            self.record_first_observation(&result.key, &result, winning_hash, &status).await;
            return;
        }

        let required = self.bridge.chain_config().confirmations;
        if status.confirmations < required {
            return;
        }

        let contract_address = self.bridge.token_contract_address(&result.pair_id);
        if is_failed_receipt(&status, contract_address.as_deref()) {
            self.mark_terminal(&result.key, false).await;
        } else {
            self.mark_terminal(&result.key, true).await;
        }
    }

    /// Probes every hash ever broadcast for this result, returning the first one found on-chain
    /// (§4.5 canonical tx selection). A hash that has disappeared between passes (reorg) is
    /// simply skipped; the result stays in its current recorded state (§4.5 reorg tolerance).
    async fn probe_on_chain_hash(&self, result: &SwapResult) -> Option<(String, TxStatus)> {
        for hash in result.all_swap_txs() {
            match self.bridge.get_transaction_status(hash).await {
                Ok(status) if status.is_on_chain() => return Some((hash.to_string(), status)),
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!(key = %result.key, hash, %err, "get_transaction_status rpc call failed");
                    continue;
                }
            }
        }
        None
    }

    async fn record_first_observation(&self, key: &SwapKey, result: &SwapResult, winning_hash: String, status: &TxStatus) {
        let swap_tx = (winning_hash != result.swap_tx).then_some(winning_hash);
        let match_tx = MatchTx {
            swap_height: status.block_height,
            swap_time: status.block_time,
            swap_tx,
        };
        if let Err(err) = self.store.update_router_swap_result(key, ResultStatus::MatchTxNotStable, match_tx).await {
            tracing::warn!(%key, %err, "first-observation update lost the CAS race");
        }
    }

    async fn mark_terminal(&self, key: &SwapKey, success: bool) {
        let outcome = if success {
            self.store.mark_swap_result_stable(key).await
        } else {
            self.store.mark_swap_result_failed(key).await
        };
        if let Err(err) = outcome {
            tracing::warn!(%key, %err, "terminal promotion lost the CAS race");
        }
    }
}

/// The empty-logs rule only applies to token-contract swaps (§4.5): a native-coin swap has no
/// contract to emit a transfer event, so a successful receipt with no logs is expected, not a
/// failure. `contract_address` is `None` for native-coin swaps.
fn is_failed_receipt(status: &TxStatus, contract_address: Option<&str>) -> bool {
    match &status.receipt {
        None => true,
        Some(receipt) => {
            !receipt.success || (contract_address.is_some_and(|addr| !addr.is_empty()) && receipt.log_count == 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_store::InMemorySwapStore;
    use router_test_utils::MockBridge;
    use router_types::{ChainConfig, TxReceipt};
    use rust_decimal::Decimal;

    fn chain_config() -> ChainConfig {
        ChainConfig {
            chain_id: 2,
            default_gas_limit: 0,
            plus_gas_price_percentage: 0,
            max_gas_price_fluct_percent: 0,
            confirmations: 10,
            wait_time_to_replace: 0,
            max_replace_count: 0,
            initial_height: 0,
            router_mpc: "0xmpc".into(),
            reserve_gas_fee: None,
        }
    }

    async fn seeded_result(store: &InMemorySwapStore, key: SwapKey, swap_tx: &str) -> SwapResult {
        let mut result = SwapResult::new_match_empty(key.clone(), 2, "pair", "0xbind", Decimal::ONE, 7, 0);
        result.swap_tx = swap_tx.into();
        result.old_swap_txs = vec![swap_tx.into()];
        result.status = ResultStatus::MatchTxNotStable;
        store.add_initial_swap_result(result.clone()).await.unwrap();
        result
    }

    #[tokio::test]
    async fn first_pass_records_height_without_promoting_status() {
        let store = Arc::new(InMemorySwapStore::new());
        let bridge = Arc::new(MockBridge::new(chain_config()));
        let key = SwapKey::new(1, "0xabc", 0);
        seeded_result(&store, key.clone(), "0xhash1").await;
        bridge.set_tx_status(
            "0xhash1",
            TxStatus {
                block_height: 1000,
                block_time: 5,
                confirmations: 3,
                receipt: Some(TxReceipt { success: true, log_count: 1 }),
            },
        );

        let stabilizer = Stabilizer::new(store.clone(), bridge, 3600);
        stabilizer.run_pass(100).await;

        let result = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(result.swap_height, 1000);
        assert_eq!(result.status, ResultStatus::MatchTxNotStable);
    }

    #[tokio::test]
    async fn second_pass_promotes_to_stable_once_confirmed() {
        let store = Arc::new(InMemorySwapStore::new());
        let bridge = Arc::new(MockBridge::new(chain_config()));
        let key = SwapKey::new(1, "0xabc", 0);
        seeded_result(&store, key.clone(), "0xhash1").await;
        bridge.set_tx_status(
            "0xhash1",
            TxStatus {
                block_height: 1000,
                block_time: 5,
                confirmations: 3,
                receipt: Some(TxReceipt { success: true, log_count: 1 }),
            },
        );
        let stabilizer = Stabilizer::new(store.clone(), bridge.clone(), 3600);
        stabilizer.run_pass(100).await;

        bridge.set_tx_status(
            "0xhash1",
            TxStatus {
                block_height: 1000,
                block_time: 5,
                confirmations: 15,
                receipt: Some(TxReceipt { success: true, log_count: 1 }),
            },
        );
        stabilizer.run_pass(200).await;

        let result = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(result.status, ResultStatus::Stable);
    }

    #[tokio::test]
    async fn empty_logs_on_an_otherwise_successful_receipt_marks_failed_for_a_token_contract_swap() {
        let store = Arc::new(InMemorySwapStore::new());
        let bridge = Arc::new(MockBridge::new(chain_config()));
        bridge.set_token_contract_address("pair", "0xtoken");
        let key = SwapKey::new(1, "0xabc", 0);
        seeded_result(&store, key.clone(), "0xhash1").await;
        bridge.set_tx_status(
            "0xhash1",
            TxStatus {
                block_height: 1000,
                block_time: 5,
                confirmations: 15,
                receipt: Some(TxReceipt { success: true, log_count: 0 }),
            },
        );
        let stabilizer = Stabilizer::new(store.clone(), bridge.clone(), 3600);
        stabilizer.run_pass(100).await;
        stabilizer.run_pass(200).await;

        let result = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(result.status, ResultStatus::Failed);
    }

    #[tokio::test]
    async fn empty_logs_on_a_native_coin_swap_still_promotes_to_stable() {
        let store = Arc::new(InMemorySwapStore::new());
        // No contract address registered for "pair": a native-coin swap, which legitimately
        // emits no transfer event.
        let bridge = Arc::new(MockBridge::new(chain_config()));
        let key = SwapKey::new(1, "0xabc", 0);
        seeded_result(&store, key.clone(), "0xhash1").await;
        bridge.set_tx_status(
            "0xhash1",
            TxStatus {
                block_height: 1000,
                block_time: 5,
                confirmations: 15,
                receipt: Some(TxReceipt { success: true, log_count: 0 }),
            },
        );
        let stabilizer = Stabilizer::new(store.clone(), bridge.clone(), 3600);
        stabilizer.run_pass(100).await;
        stabilizer.run_pass(200).await;

        let result = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(result.status, ResultStatus::Stable);
    }

    #[tokio::test]
    async fn replacement_hash_becomes_the_new_canonical_tx() {
        let store = Arc::new(InMemorySwapStore::new());
        let bridge = Arc::new(MockBridge::new(chain_config()));
        let key = SwapKey::new(1, "0xabc", 0);
        let mut result = SwapResult::new_match_empty(key.clone(), 2, "pair", "0xbind", Decimal::ONE, 7, 0);
        result.swap_tx = "0xhash1".into();
        result.old_swap_txs = vec!["0xhash1".into(), "0xhash2".into()];
        result.status = ResultStatus::MatchTxNotStable;
        store.add_initial_swap_result(result).await.unwrap();

        // hash1 never lands; hash2 (the replacement) does.
        bridge.set_tx_status(
            "0xhash2",
            TxStatus {
                block_height: 1050,
                block_time: 5,
                confirmations: 1,
                receipt: Some(TxReceipt { success: true, log_count: 1 }),
            },
        );

        let stabilizer = Stabilizer::new(store.clone(), bridge, 3600);
        stabilizer.run_pass(100).await;

        let stored = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(stored.swap_tx, "0xhash2");
        assert_eq!(stored.swap_height, 1050);
    }

    #[tokio::test]
    async fn nothing_on_chain_yet_is_a_no_op() {
        let store = Arc::new(InMemorySwapStore::new());
        let bridge = Arc::new(MockBridge::new(chain_config()));
        let key = SwapKey::new(1, "0xabc", 0);
        seeded_result(&store, key.clone(), "0xhash1").await;
        bridge.set_tx_status("0xhash1", TxStatus::default());

        let stabilizer = Stabilizer::new(store.clone(), bridge, 3600);
        stabilizer.run_pass(100).await;

        let result = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(result.swap_height, 0);
        assert_eq!(result.status, ResultStatus::MatchTxNotStable);
    }
}
