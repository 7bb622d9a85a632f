//! The Signer/Broadcaster (§4.4): sign, persist, then broadcast, in that exact order.

use router_store::{MatchTx, SwapStore};
use router_types::{Bridge, MpcSigner, RawTx, ResultStatus, SignBroadcastError, SwapKey};

/// Signs `raw_tx`, persists its hash to the store, then broadcasts it.
///
/// Persistence precedes broadcast (§4.4): a crash between the two leaves the hash durably
/// recorded so the Stabilizer/Replacer can later discover whether it actually landed, while a
/// crash after broadcast but before persisting a hash that was never recorded is impossible by
/// construction.
pub async fn sign_and_broadcast<S: SwapStore>(
    store: &S,
    bridge: &dyn Bridge,
    signer: &dyn MpcSigner,
    key: &SwapKey,
    raw_tx: &RawTx,
) -> Result<(), SignBroadcastError> {
    let signed = signer
        .sign(&raw_tx.encoded)
        .await
        .map_err(|err| SignBroadcastError::Sign(err.to_string()))?;

    store
        .update_swap_tx(key, ResultStatus::MatchEmpty, ResultStatus::MatchTxNotStable, signed.tx_hash.clone())
        .await
        .map_err(|err| SignBroadcastError::Sign(format!("failed to persist {}: {err}", signed.tx_hash)))?;

    bridge
        .broadcast_transaction(&signed.signed)
        .await
        .map_err(|err| SignBroadcastError::Broadcast(err.to_string()))?;

    Ok(())
}

/// Re-broadcasts a replacement hash that the Builder/Signer has already produced, appending it
/// to `OldSwapTxs` rather than overwriting the canonical hash outright (§4.6: the Replacer shares
/// the prior result's status; only the Stabilizer picks the new canonical winner).
pub async fn sign_and_broadcast_replacement<S: SwapStore>(
    store: &S,
    bridge: &dyn Bridge,
    signer: &dyn MpcSigner,
    key: &SwapKey,
    raw_tx: &RawTx,
) -> Result<(), SignBroadcastError> {
    let signed = signer
        .sign(&raw_tx.encoded)
        .await
        .map_err(|err| SignBroadcastError::Sign(err.to_string()))?;

    store
        .update_old_swap_txs(key, signed.tx_hash.clone())
        .await
        .map_err(|err| SignBroadcastError::Sign(format!("failed to persist {}: {err}", signed.tx_hash)))?;

    bridge
        .broadcast_transaction(&signed.signed)
        .await
        .map_err(|err| SignBroadcastError::Broadcast(err.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_store::InMemorySwapStore;
    use router_test_utils::{MockBridge, MockMpcSigner};
    use router_types::{ChainConfig, ExtraArgs, SwapResult};
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

    fn raw_tx() -> RawTx {
        RawTx {
            encoded: b"rawtx".to_vec(),
            extra: ExtraArgs::default(),
        }
    }

    #[tokio::test]
    async fn persists_tx_hash_before_broadcasting() {
        let store = InMemorySwapStore::new();
        let bridge = MockBridge::new(chain_config());
        let signer = MockMpcSigner::new();
        signer.push_ok("0xhash1", b"signed".to_vec());

        let key = SwapKey::new(1, "0xabc", 0);
        let result = SwapResult::new_match_empty(key.clone(), 2, "pair", "0xbind", Decimal::ONE, 7, 0);
        store.add_initial_swap_result(result).await.unwrap();

        sign_and_broadcast(&store, &bridge, &signer, &key, &raw_tx()).await.unwrap();

        let stored = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(stored.swap_tx, "0xhash1");
        assert_eq!(stored.status, ResultStatus::MatchTxNotStable);
        assert_eq!(stored.old_swap_txs, vec!["0xhash1".to_string()]);
        assert_eq!(bridge.call_count("broadcast_transaction"), 1);
    }

    #[tokio::test]
    async fn broadcast_failure_leaves_the_persisted_hash_in_place() {
        let store = InMemorySwapStore::new();
        let bridge = MockBridge::new(chain_config());
        bridge.fail_broadcast("network unreachable");
        let signer = MockMpcSigner::new();
        signer.push_ok("0xhash1", b"signed".to_vec());

        let key = SwapKey::new(1, "0xabc", 0);
        let result = SwapResult::new_match_empty(key.clone(), 2, "pair", "0xbind", Decimal::ONE, 7, 0);
        store.add_initial_swap_result(result).await.unwrap();

        let err = sign_and_broadcast(&store, &bridge, &signer, &key, &raw_tx()).await.unwrap_err();
        assert!(matches!(err, SignBroadcastError::Broadcast(_)));

        let stored = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(stored.swap_tx, "0xhash1");
        assert_eq!(stored.status, ResultStatus::MatchTxNotStable);
    }

    #[tokio::test]
    async fn replacement_extends_old_swap_txs_without_touching_canonical_hash() {
        let store = InMemorySwapStore::new();
        let bridge = MockBridge::new(chain_config());
        let signer = MockMpcSigner::new();
        signer.push_ok("0xhash2", b"signed".to_vec());

        let key = SwapKey::new(1, "0xabc", 0);
        let mut result = SwapResult::new_match_empty(key.clone(), 2, "pair", "0xbind", Decimal::ONE, 7, 0);
        result.swap_tx = "0xhash1".into();
        result.old_swap_txs = vec!["0xhash1".into()];
        result.status = ResultStatus::MatchTxNotStable;
        store.add_initial_swap_result(result).await.unwrap();

        sign_and_broadcast_replacement(&store, &bridge, &signer, &key, &raw_tx()).await.unwrap();

        let stored = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(stored.swap_tx, "0xhash1");
        assert_eq!(stored.old_swap_txs, vec!["0xhash1".to_string(), "0xhash2".to_string()]);
    }
}
