//! The Replacer (§4.6): fee-bumps a stuck outbound tx using the same nonce.

use std::sync::Arc;

use router_store::SwapStore;
use router_types::{
    Bridge, BuildTxArgs, ExtraArgs, MpcSigner, NonceTag, ReplaceError, ResultStatus, SwapResult, SwapType,
};

use crate::build::{build, GasPriceTracker};
use crate::broadcast::sign_and_broadcast_replacement;

pub struct Replacer<S, B, M> {
    store: Arc<S>,
    bridge: Arc<B>,
    signer: Arc<M>,
    gas_tracker: Arc<GasPriceTracker>,
}

impl<S, B, M> Replacer<S, B, M>
where
    S: SwapStore,
    B: Bridge + ?Sized,
    M: MpcSigner + ?Sized,
{
    pub fn new(store: Arc<S>, bridge: Arc<B>, signer: Arc<M>, gas_tracker: Arc<GasPriceTracker>) -> Self {
        Self {
            store,
            bridge,
            signer,
            gas_tracker,
        }
    }

    /// Scans every not-yet-stable result regardless of age; the `waitTimeToReplace` test below
    /// is the trigger, not a store-level horizon (§4.6 contract: "stuck past a deadline").
    pub async fn run_pass(&self, now: i64) {
        let results = self.store.find_router_swap_results_with_status(ResultStatus::MatchTxNotStable, 0).await;
        let wait_time = self.bridge.chain_config().wait_time_to_replace();
        for result in results {
            if now - result.timestamp < wait_time {
                continue;
            }
            self.replace_one(result).await;
        }
    }

    async fn replace_one(&self, result: SwapResult) {
        let key = result.key.clone();
        if let Err(err) = check_static_preconditions(&result, self.bridge.chain_config().max_replace_count()) {
            tracing::debug!(%key, %err, "replacement preconditions not met");
            return;
        }
        match self.check_onchain_preconditions(&result).await {
            Ok(()) => {}
            Err(Some(err)) => {
                tracing::debug!(%key, %err, "replacement preconditions not met");
                return;
            }
            Err(None) => return, // an RPC call failed; try again next pass
        }

        let Some(request) = self.store.find_router_swap(&key).await else {
            tracing::warn!(%key, "no matching request for a replaceable result, skipping");
            return;
        };

        let args = BuildTxArgs {
            token_id: request.token_id,
            from: self.bridge.chain_config().router_mpc.clone(),
            to: result.recipient.clone(),
            swap_type: SwapType::RouterSwap,
            value: result.value,
            bind: result.recipient.clone(),
            pair_id: result.pair_id.clone(),
            input: None,
            // The nonce is fixed, never re-queried (§4.6: "Nonce = SwapNonce fixed").
            extra: ExtraArgs {
                nonce: Some(result.nonce),
                gas_price: None,
                gas_limit: None,
            },
        };

        match build(self.bridge.as_ref(), &self.gas_tracker, args).await {
            Ok(raw_tx) => {
                if let Err(err) =
                    sign_and_broadcast_replacement(self.store.as_ref(), self.bridge.as_ref(), self.signer.as_ref(), &key, &raw_tx).await
                {
                    tracing::warn!(%key, %err, "replacement sign/broadcast failed");
                }
            }
            Err(err) => tracing::warn!(%key, %err, "replacement build failed"),
        }
    }

    /// Precondition 4 (none of the broadcast hashes is on-chain) and precondition 5 (the pool's
    /// latest nonce has not already consumed ours), both re-checked at the moment of
    /// replacement. `Ok(None)`-shaped errors distinguish "an RPC call failed, try again" from a
    /// genuine precondition failure the caller should log as such.
    async fn check_onchain_preconditions(&self, result: &SwapResult) -> Result<(), Option<ReplaceError>> {
        for hash in result.all_swap_txs() {
            match self.bridge.get_transaction_status(hash).await {
                Ok(status) if status.is_on_chain() => return Err(Some(ReplaceError::AlreadyOnChain)),
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!(key = %result.key, hash, %err, "get_transaction_status rpc call failed");
                    return Err(None);
                }
            }
        }

        let account = &self.bridge.chain_config().router_mpc;
        let latest = match self.bridge.get_pool_nonce(account, NonceTag::Latest).await {
            Ok(nonce) => nonce,
            Err(err) => {
                tracing::warn!(key = %result.key, %err, "get_pool_nonce rpc call failed");
                return Err(None);
            }
        };
        if latest > result.nonce {
            return Err(Some(ReplaceError::NonceAlreadyConsumed { ours: result.nonce, latest }));
        }
        Ok(())
    }
}

fn check_static_preconditions(result: &SwapResult, max_replace_count: usize) -> Result<(), ReplaceError> {
    if result.swap_tx.is_empty() {
        return Err(ReplaceError::NoSwapTxYet);
    }
    if result.status != ResultStatus::MatchTxNotStable {
        return Err(ReplaceError::NotInReplaceableStatus);
    }
    if result.swap_height != 0 {
        return Err(ReplaceError::AlreadyObserved);
    }
    if result.old_swap_txs.len() > max_replace_count {
        return Err(ReplaceError::TooManyReplacements { max: max_replace_count });
    }
    Ok(())
}
