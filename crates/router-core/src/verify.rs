//! The Verifier (§4.1): promotes newly-scanned swaps from *unverified* to *verified/rejected*.

use std::sync::Arc;

use router_store::SwapStore;
use router_types::{
    BlacklistPolicy, Bridge, NonceTag, RequestStatus, SwapInfo, SwapKey, SwapRequest, SwapResult, VerifyError,
};

use crate::nonce::NonceLocks;

pub struct Verifier<S, B, P> {
    store: Arc<S>,
    bridge: Arc<B>,
    policy: Arc<P>,
    nonce_locks: Arc<NonceLocks>,
    /// Requests younger than `now - horizon_secs` are examined; older unverified records are
    /// left alone (§4.1, "re-examined ... until it ages out beyond the verify horizon").
    horizon_secs: i64,
}

impl<S, B, P> Verifier<S, B, P>
where
    S: SwapStore,
    B: Bridge + ?Sized,
    P: BlacklistPolicy + ?Sized,
{
    pub fn new(store: Arc<S>, bridge: Arc<B>, policy: Arc<P>, nonce_locks: Arc<NonceLocks>, horizon_secs: i64) -> Self {
        Self {
            store,
            bridge,
            policy,
            nonce_locks,
            horizon_secs,
        }
    }

    pub async fn run_pass(&self, now: i64) {
        let min_timestamp = now - self.horizon_secs;
        let requests = self
            .store
            .find_router_swaps_with_status(RequestStatus::Unverified, min_timestamp)
            .await;
        for request in requests {
            self.verify_one(request, now).await;
        }
    }

    async fn verify_one(&self, request: SwapRequest, now: i64) {
        let key = request.key.clone();

        // Policy order step 1 (§4.1): blacklist lookup runs before the bridge is ever consulted,
        // and a hit is terminal — never retried (§8 scenario 6).
        if self
            .policy
            .is_blacklisted(key.from_chain_id, request.to_chain_id, &request.token_id)
        {
            self.transition(&key, RequestStatus::Blacklisted, now, Some(VerifyError::SwapInBlacklist.to_string()))
                .await;
            return;
        }

        // Error-before-info discipline (§4.1, §9 Open Question, resolved): the typed Result is
        // matched first; SwapInfo fields are only ever read out of the Ok arm below.
        match self
            .bridge
            .verify_router_swap_tx(&request.key.tx_id, request.key.log_index, false)
            .await
        {
            Err(err) if err.is_retryable() => {
                tracing::debug!(%key, %err, "verification retryable, leaving unverified");
            }
            Err(err) => {
                let status = rejection_status(&err);
                let memo = Some(err.to_string());
                self.transition(&key, status, now, memo).await;
            }
            Ok(info) => self.accept_or_reject(&request, info, now).await,
        }
    }

    async fn accept_or_reject(&self, request: &SwapRequest, info: SwapInfo, now: i64) {
        let key = &request.key;
        let initial_height = self.bridge.chain_config().initial_height;
        if info.height != 0 && info.height < initial_height {
            self.transition(key, RequestStatus::WrongPath, now, Some("source height before initial height".into()))
                .await;
            return;
        }

        let threshold = self.bridge.big_value_threshold(&info.token);
        if info.value > threshold {
            self.transition(key, RequestStatus::BigValue, now, None).await;
            return;
        }

        self.accept(request, info, now).await;
    }

    /// Assigns the outbound nonce and creates the initial `match-empty` result row, then
    /// transitions the request to `verified` (§4.1 policy step 4). Nonce assignment is
    /// serialized per `(chain, account)` (§5 ordering guarantee; §9 design decision (a)) so two
    /// concurrent passes — across chains sharing no account — can still run in parallel.
    async fn accept(&self, request: &SwapRequest, info: SwapInfo, now: i64) {
        let config = self.bridge.chain_config();
        let account = config.router_mpc.clone();
        let chain_id = config.chain_id;

        let _nonce_guard = self.nonce_locks.lock(chain_id, &account).await;
        let pending_nonce = match self.bridge.get_pool_nonce(&account, NonceTag::Pending).await {
            Ok(nonce) => nonce,
            Err(err) => {
                tracing::warn!(key = %request.key, %err, "get_pool_nonce failed, retrying next pass");
                return;
            }
        };
        let nonce = self.bridge.adjust_nonce(&account, pending_nonce);

        let result = SwapResult::new_match_empty(
            request.key.clone(),
            request.to_chain_id,
            info.pair_id,
            request.bind.clone(),
            info.value,
            nonce,
            now,
        );
        if let Err(err) = self.store.add_initial_swap_result(result).await {
            tracing::warn!(key = %request.key, %err, "swap result already exists, verifying again is a no-op");
        }

        self.transition(&request.key, RequestStatus::Verified, now, None).await;
    }

    async fn transition(&self, key: &SwapKey, status: RequestStatus, now: i64, memo: Option<String>) {
        if let Err(err) = self
            .store
            .update_router_swap_status(key, RequestStatus::Unverified, status, now, memo)
            .await
        {
            tracing::warn!(%key, %err, "status transition lost the CAS race, another pass already moved this record");
        }
    }
}

fn rejection_status(err: &VerifyError) -> RequestStatus {
    match err {
        VerifyError::TxNotStable | VerifyError::TxNotFound => {
            unreachable!("retryable errors are handled before rejection_status is called")
        }
        VerifyError::TxWithWrongValue => RequestStatus::WrongValue,
        VerifyError::TxWithWrongPath => RequestStatus::WrongPath,
        VerifyError::MissTokenConfig(_) => RequestStatus::MissTokenConfig,
        VerifyError::NoUnderlyingToken(_) => RequestStatus::NoUnderlyingToken,
        VerifyError::Bridge(_) | VerifyError::Other(_) => RequestStatus::VerifyFailed,
    }
}
