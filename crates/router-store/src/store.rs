//! The [`SwapStore`] trait (§6.4): the single source of truth for pipeline progress.
//!
//! Every mutation is conditional on the row's expected prior status so that two jobs racing on
//! the same key never clobber each other's progress (§5). A production deployment would back
//! this trait with a SQL- or document-store; that implementation is out of scope here exactly
//! as the chain RPC wrappers are (§6.4) — only [`crate::memory::InMemorySwapStore`] ships in
//! this crate.

use async_trait::async_trait;
use router_types::{RequestStatus, ResultStatus, SwapKey, SwapRequest, SwapResult};

use crate::error::StoreError;

/// The first-observation update the Stabilizer makes before a result is eligible for the
/// confirmations check (§4.5, "two-phase promotion").
#[derive(Debug, Clone)]
pub struct MatchTx {
    pub swap_height: u64,
    pub swap_time: i64,
    /// Set only when the canonical tx hash changed this pass (a replacement just won).
    pub swap_tx: Option<String>,
}

#[async_trait]
pub trait SwapStore: Send + Sync {
    /// Requests in `status` observed at or after `min_timestamp` (the verify/stable/replace
    /// horizon in §4.1/§4.5/§4.6 is enforced by the caller picking `min_timestamp`).
    async fn find_router_swaps_with_status(
        &self,
        status: RequestStatus,
        min_timestamp: i64,
    ) -> Vec<SwapRequest>;

    async fn find_router_swap_results_with_status(
        &self,
        status: ResultStatus,
        min_timestamp: i64,
    ) -> Vec<SwapResult>;

    async fn find_router_swap(&self, key: &SwapKey) -> Option<SwapRequest>;

    async fn find_router_swap_result(&self, key: &SwapKey) -> Option<SwapResult>;

    /// Inserts a request row fresh from the Scanner. Idempotent by primary key: re-inserting an
    /// existing key is a silent no-op (§6.3, "the Verifier tolerates lag and duplicates").
    async fn insert_router_swap(&self, request: SwapRequest);

    /// CAS: only succeeds if the request's current status equals `expected`.
    async fn update_router_swap_status(
        &self,
        key: &SwapKey,
        expected: RequestStatus,
        new_status: RequestStatus,
        timestamp: i64,
        memo: Option<String>,
    ) -> Result<(), StoreError>;

    /// Creates the initial `MatchEmpty` result row for an accepted request (§4.1 policy step 4).
    /// Fails if a result already exists for this key (invariant 1/2: at most one result per
    /// request, nonce assigned exactly once).
    async fn add_initial_swap_result(&self, result: SwapResult) -> Result<(), StoreError>;

    /// Appends (if not already present) a new outbound hash to `old_swap_txs` (§4.4 step 2,
    /// §4.6 replacement).
    async fn update_old_swap_txs(&self, key: &SwapKey, tx_hash: String) -> Result<(), StoreError>;

    /// Sets the canonical `swap_tx` without touching status (used by the Signer/Broadcaster
    /// immediately after signing, before broadcasting — §4.4 step 2).
    async fn update_swap_tx(
        &self,
        key: &SwapKey,
        expected_status: ResultStatus,
        new_status: ResultStatus,
        swap_tx: String,
    ) -> Result<(), StoreError>;

    /// First-observation update (§4.5 two-phase promotion, phase 1): records height/time and
    /// possibly a new canonical hash, without changing status.
    async fn update_router_swap_result(
        &self,
        key: &SwapKey,
        expected_status: ResultStatus,
        match_tx: MatchTx,
    ) -> Result<(), StoreError>;

    /// CAS: `MatchTxNotStable` → `Stable` (terminal).
    async fn mark_swap_result_stable(&self, key: &SwapKey) -> Result<(), StoreError>;

    /// CAS: `MatchTxNotStable` → `Failed` (terminal).
    async fn mark_swap_result_failed(&self, key: &SwapKey) -> Result<(), StoreError>;
}
