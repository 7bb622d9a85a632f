//! [`InMemorySwapStore`]: a `dashmap`-backed [`SwapStore`] implementation.
//!
//! `dashmap` is already this codebase's go-to concurrent map (the same crate backs the chain
//! provider caches elsewhere in the workspace's ambient stack). Per-key mutations go through
//! `DashMap::get_mut`, which holds that key's shard lock for the duration of the closure — so a
//! read-check-write CAS sequence on one key can never interleave with another job's CAS on the
//! same key, satisfying §5's "shared resources" requirement without a separate lock table.

use async_trait::async_trait;
use dashmap::DashMap;
use router_types::{RequestStatus, ResultStatus, SwapKey, SwapRequest, SwapResult};

use crate::error::StoreError;
use crate::store::{MatchTx, SwapStore};

/// In-process `SwapStore`. Durable persistence is out of scope (§6.4) — a production
/// deployment swaps in a SQL- or document-store-backed implementation of the same trait.
#[derive(Default)]
pub struct InMemorySwapStore {
    requests: DashMap<SwapKey, SwapRequest>,
    results: DashMap<SwapKey, SwapResult>,
}

impl InMemorySwapStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SwapStore for InMemorySwapStore {
    async fn find_router_swaps_with_status(
        &self,
        status: RequestStatus,
        min_timestamp: i64,
    ) -> Vec<SwapRequest> {
        self.requests
            .iter()
            .filter(|entry| entry.status == status && entry.timestamp >= min_timestamp)
            .map(|entry| entry.value().clone())
            .collect()
    }

    async fn find_router_swap_results_with_status(
        &self,
        status: ResultStatus,
        min_timestamp: i64,
    ) -> Vec<SwapResult> {
        self.results
            .iter()
            .filter(|entry| entry.status == status && entry.timestamp >= min_timestamp)
            .map(|entry| entry.value().clone())
            .collect()
    }

    async fn find_router_swap(&self, key: &SwapKey) -> Option<SwapRequest> {
        self.requests.get(key).map(|entry| entry.value().clone())
    }

    async fn find_router_swap_result(&self, key: &SwapKey) -> Option<SwapResult> {
        self.results.get(key).map(|entry| entry.value().clone())
    }

    async fn insert_router_swap(&self, request: SwapRequest) {
        self.requests.entry(request.key.clone()).or_insert(request);
    }

    async fn update_router_swap_status(
        &self,
        key: &SwapKey,
        expected: RequestStatus,
        new_status: RequestStatus,
        timestamp: i64,
        memo: Option<String>,
    ) -> Result<(), StoreError> {
        let mut entry = self
            .requests
            .get_mut(key)
            .ok_or_else(|| StoreError::RequestNotFound(key.clone()))?;
        if entry.status != expected {
            return Err(StoreError::RequestStatusMismatch {
                key: key.clone(),
                expected,
                actual: entry.status,
            });
        }
        if entry.status.is_terminal() {
            return Err(StoreError::RequestStatusMismatch {
                key: key.clone(),
                expected,
                actual: entry.status,
            });
        }
        entry.status = new_status;
        entry.status_timestamp = timestamp;
        entry.memo = memo;
        Ok(())
    }

    async fn add_initial_swap_result(&self, result: SwapResult) -> Result<(), StoreError> {
        let key = result.key.clone();
        match self.results.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::ResultAlreadyExists(key)),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(result);
                Ok(())
            }
        }
    }

    async fn update_old_swap_txs(&self, key: &SwapKey, tx_hash: String) -> Result<(), StoreError> {
        let mut entry = self
            .results
            .get_mut(key)
            .ok_or_else(|| StoreError::ResultNotFound(key.clone()))?;
        if !entry.old_swap_txs.iter().any(|tx| tx == &tx_hash) {
            entry.old_swap_txs.push(tx_hash);
        }
        Ok(())
    }

    async fn update_swap_tx(
        &self,
        key: &SwapKey,
        expected_status: ResultStatus,
        new_status: ResultStatus,
        swap_tx: String,
    ) -> Result<(), StoreError> {
        let mut entry = self
            .results
            .get_mut(key)
            .ok_or_else(|| StoreError::ResultNotFound(key.clone()))?;
        if entry.status != expected_status {
            return Err(StoreError::ResultStatusMismatch {
                key: key.clone(),
                expected: expected_status,
                actual: entry.status,
            });
        }
        entry.swap_tx = swap_tx.clone();
        if !entry.old_swap_txs.iter().any(|tx| tx == &swap_tx) {
            entry.old_swap_txs.push(swap_tx);
        }
        entry.status = new_status;
        Ok(())
    }

    async fn update_router_swap_result(
        &self,
        key: &SwapKey,
        expected_status: ResultStatus,
        match_tx: MatchTx,
    ) -> Result<(), StoreError> {
        let mut entry = self
            .results
            .get_mut(key)
            .ok_or_else(|| StoreError::ResultNotFound(key.clone()))?;
        if entry.status != expected_status {
            return Err(StoreError::ResultStatusMismatch {
                key: key.clone(),
                expected: expected_status,
                actual: entry.status,
            });
        }
        entry.swap_height = match_tx.swap_height;
        entry.swap_time = match_tx.swap_time;
        if let Some(swap_tx) = match_tx.swap_tx {
            entry.swap_tx = swap_tx;
        }
        Ok(())
    }

    async fn mark_swap_result_stable(&self, key: &SwapKey) -> Result<(), StoreError> {
        let mut entry = self
            .results
            .get_mut(key)
            .ok_or_else(|| StoreError::ResultNotFound(key.clone()))?;
        if entry.status != ResultStatus::MatchTxNotStable {
            return Err(StoreError::ResultStatusMismatch {
                key: key.clone(),
                expected: ResultStatus::MatchTxNotStable,
                actual: entry.status,
            });
        }
        entry.status = ResultStatus::Stable;
        Ok(())
    }

    async fn mark_swap_result_failed(&self, key: &SwapKey) -> Result<(), StoreError> {
        let mut entry = self
            .results
            .get_mut(key)
            .ok_or_else(|| StoreError::ResultNotFound(key.clone()))?;
        if entry.status != ResultStatus::MatchTxNotStable {
            return Err(StoreError::ResultStatusMismatch {
                key: key.clone(),
                expected: ResultStatus::MatchTxNotStable,
                actual: entry.status,
            });
        }
        entry.status = ResultStatus::Failed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_types::SwapRequest;
    use rust_decimal::Decimal;

    fn request(key: SwapKey) -> SwapRequest {
        SwapRequest::new_unverified(key, 2, "usdc", "0xfrom", "0xbind", Decimal::ONE, 100, 1_000)
    }

    #[tokio::test]
    async fn duplicate_insert_from_scanner_is_a_no_op() {
        let store = InMemorySwapStore::new();
        let key = SwapKey::new(1, "0xabc", 0);
        store.insert_router_swap(request(key.clone())).await;
        let mut dup = request(key.clone());
        dup.value = Decimal::from(999);
        store.insert_router_swap(dup).await;

        let stored = store.find_router_swap(&key).await.unwrap();
        assert_eq!(stored.value, Decimal::ONE);
    }

    #[tokio::test]
    async fn status_cas_rejects_stale_expectation() {
        let store = InMemorySwapStore::new();
        let key = SwapKey::new(1, "0xabc", 0);
        store.insert_router_swap(request(key.clone())).await;

        store
            .update_router_swap_status(&key, RequestStatus::Unverified, RequestStatus::Verified, 2, None)
            .await
            .unwrap();

        let err = store
            .update_router_swap_status(&key, RequestStatus::Unverified, RequestStatus::BigValue, 3, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::RequestStatusMismatch {
                key,
                expected: RequestStatus::Unverified,
                actual: RequestStatus::Verified,
            }
        );
    }

    #[tokio::test]
    async fn terminal_request_status_never_regresses() {
        let store = InMemorySwapStore::new();
        let key = SwapKey::new(1, "0xabc", 0);
        store.insert_router_swap(request(key.clone())).await;
        store
            .update_router_swap_status(&key, RequestStatus::Unverified, RequestStatus::Blacklisted, 2, None)
            .await
            .unwrap();

        let err = store
            .update_router_swap_status(&key, RequestStatus::Blacklisted, RequestStatus::Verified, 3, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RequestStatusMismatch { .. }));
    }

    #[tokio::test]
    async fn second_result_for_same_key_is_rejected() {
        let store = InMemorySwapStore::new();
        let key = SwapKey::new(1, "0xabc", 0);
        let result = SwapResult::new_match_empty(key.clone(), 2, "pair", "0xbind", Decimal::ONE, 7, 10);
        store.add_initial_swap_result(result.clone()).await.unwrap();

        let err = store.add_initial_swap_result(result).await.unwrap_err();
        assert_eq!(err, StoreError::ResultAlreadyExists(key));
    }

    #[tokio::test]
    async fn update_old_swap_txs_dedupes() {
        let store = InMemorySwapStore::new();
        let key = SwapKey::new(1, "0xabc", 0);
        let result = SwapResult::new_match_empty(key.clone(), 2, "pair", "0xbind", Decimal::ONE, 7, 10);
        store.add_initial_swap_result(result).await.unwrap();

        store.update_old_swap_txs(&key, "h1".into()).await.unwrap();
        store.update_old_swap_txs(&key, "h1".into()).await.unwrap();
        store.update_old_swap_txs(&key, "h2".into()).await.unwrap();

        let stored = store.find_router_swap_result(&key).await.unwrap();
        assert_eq!(stored.old_swap_txs, vec!["h1".to_string(), "h2".to_string()]);
    }

    #[tokio::test]
    async fn stable_and_failed_require_match_tx_not_stable() {
        let store = InMemorySwapStore::new();
        let key = SwapKey::new(1, "0xabc", 0);
        let result = SwapResult::new_match_empty(key.clone(), 2, "pair", "0xbind", Decimal::ONE, 7, 10);
        store.add_initial_swap_result(result).await.unwrap();

        let err = store.mark_swap_result_stable(&key).await.unwrap_err();
        assert!(matches!(err, StoreError::ResultStatusMismatch { .. }));
    }
}
