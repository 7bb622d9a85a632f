//! The Swap-Out driver (§5): dequeues `match-empty` results and drives them through the
//! Builder and Signer/Broadcaster. Its own named stage, distinct from the Verifier that created
//! the row — nonce assignment already happened there (§4.1 policy step 4); this driver only
//! ever reuses `result.nonce`, never reassigns it (invariant 2).

use std::sync::Arc;

use router_store::SwapStore;
use router_types::{Bridge, BuildTxArgs, ExtraArgs, MpcSigner, ResultStatus, SwapResult, SwapType};

use crate::broadcast::sign_and_broadcast;
use crate::build::{build, GasPriceTracker};

pub struct SwapOutDriver<S, B, M> {
    store: Arc<S>,
    bridge: Arc<B>,
    signer: Arc<M>,
    gas_tracker: Arc<GasPriceTracker>,
    horizon_secs: i64,
}

impl<S, B, M> SwapOutDriver<S, B, M>
where
    S: SwapStore,
    B: Bridge + ?Sized,
    M: MpcSigner + ?Sized,
{
    pub fn new(store: Arc<S>, bridge: Arc<B>, signer: Arc<M>, gas_tracker: Arc<GasPriceTracker>, horizon_secs: i64) -> Self {
        Self {
            store,
            bridge,
            signer,
            gas_tracker,
            horizon_secs,
        }
    }

    pub async fn run_pass(&self, now: i64) {
        let min_timestamp = now - self.horizon_secs;
        let results = self.store.find_router_swap_results_with_status(ResultStatus::MatchEmpty, min_timestamp).await;
        for result in results {
            self.drive_one(result).await;
        }
    }

    async fn drive_one(&self, result: SwapResult) {
        let key = result.key.clone();
        let Some(request) = self.store.find_router_swap(&key).await else {
            tracing::warn!(%key, "no matching request for a match-empty result, skipping");
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
            // The nonce was already assigned by the Verifier at creation time (invariant 2);
            // only gas price/limit are resolved fresh here.
            extra: ExtraArgs {
                nonce: Some(result.nonce),
                gas_price: None,
                gas_limit: None,
            },
        };

        let raw_tx = match build(self.bridge.as_ref(), &self.gas_tracker, args).await {
            Ok(raw_tx) => raw_tx,
            Err(err) => {
                tracing::warn!(%key, %err, "swap-out build failed, retrying next pass");
                return;
            }
        };

        if let Err(err) = sign_and_broadcast(self.store.as_ref(), self.bridge.as_ref(), self.signer.as_ref(), &key, &raw_tx).await {
            tracing::warn!(%key, %err, "swap-out sign/broadcast failed, retrying next pass");
        }
    }
}
