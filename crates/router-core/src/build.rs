//! The Swap-Out Builder (§4.2) and its gas-price adjustment state (§4.3).
//!
//! Owns the in-scope 25%-share algorithm: defaults resolution, the anti-oscillation gas-price
//! clamp, and the balance guard. Calls only the primitive RPC-shaped [`Bridge`] methods plus its
//! two wire-level `encode_*` hooks — never a `build_raw_transaction` method on the trait itself
//! (see the doc comment on [`router_types::Bridge`] for why that split matters).

use std::time::Duration;

use router_types::{Bridge, BridgeError, BuildError, BuildTxArgs, ExtraArgs, NonceTag, RawTx, SwapType};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

/// Tracks the last gas price this process offered on one destination chain (§4.3).
///
/// Deliberately *not* a module-level global (§9, "global mutable state -> per-chain structs"):
/// one instance is owned alongside each chain's `Bridge` handle, not shared across chains.
#[derive(Default)]
pub struct GasPriceTracker {
    latest: Mutex<Option<u64>>,
}

impl GasPriceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the plus-percentage bump, then the anti-oscillation floor clamp, then records the
    /// result as the new `latest` (§4.3 steps 2-4). The clamp only prevents the price from
    /// *falling* too fast; it never holds back an upward move.
    pub async fn adjust(&self, oracle_price: u64, plus_pct: u64, max_fluct_pct: u64) -> u64 {
        let mut latest = self.latest.lock().await;
        let mut price = oracle_price;
        if plus_pct > 0 {
            price = price.saturating_mul(100 + plus_pct) / 100;
        }
        if max_fluct_pct > 0 {
            if let Some(previous) = *latest {
                let floor = previous.saturating_mul(100 - max_fluct_pct.min(100)) / 100;
                price = price.max(floor);
            }
        }
        *latest = Some(price);
        price
    }
}

const GAS_PRICE_RETRY_ATTEMPTS: u32 = 3;
const GAS_PRICE_RETRY_DELAY: Duration = Duration::from_millis(200);
const GAS_LIMIT_INFLATION_PERCENT: u64 = 130;

/// Builds a raw outbound transaction per §4.2. `args.extra` fields already set by the caller
/// (e.g. the Replacer's fixed nonce, or an admin-supplied gas price) are taken verbatim; only
/// unset fields are resolved here.
pub async fn build(bridge: &dyn Bridge, gas_tracker: &GasPriceTracker, args: BuildTxArgs) -> Result<RawTx, BuildError> {
    if args.token_id.is_empty() {
        return Err(BuildError::MissingTokenId);
    }
    if args.from.is_empty() {
        return Err(BuildError::MissingFrom);
    }
    if args.swap_type != SwapType::RouterSwap {
        return Err(BuildError::UnsupportedSwapType);
    }
    if args.input.as_ref().is_some_and(|data| !data.is_empty()) {
        return Err(BuildError::ForbiddenInputData);
    }

    let calldata = bridge.encode_swap_calldata(&args);
    let mut extra = args.extra.clone();

    extra.gas_price = Some(match extra.gas_price {
        Some(price) => price,
        None => resolve_gas_price(bridge, gas_tracker).await?,
    });

    extra.nonce = Some(match extra.nonce {
        Some(nonce) => nonce,
        None => {
            let pending = bridge.get_pool_nonce(&args.from, NonceTag::Pending).await?;
            bridge.adjust_nonce(&args.from, pending)
        }
    });

    extra.gas_limit = Some(match extra.gas_limit {
        Some(limit) => limit,
        None => resolve_gas_limit(bridge, &args, &calldata).await?,
    });

    check_balance(bridge, &args.from, args.value).await?;

    let encoded = bridge.encode_transaction(&args.to, args.value, &extra, &calldata);
    Ok(RawTx { encoded, extra })
}

async fn resolve_gas_price(bridge: &dyn Bridge, gas_tracker: &GasPriceTracker) -> Result<u64, BuildError> {
    let oracle_price = fetch_oracle_price_with_retry(bridge).await?;
    let config = bridge.chain_config();
    Ok(gas_tracker
        .adjust(oracle_price, config.plus_gas_price_percentage, config.max_gas_price_fluct_percent)
        .await)
}

async fn fetch_oracle_price_with_retry(bridge: &dyn Bridge) -> Result<u64, BridgeError> {
    let mut last_err = None;
    for attempt in 0..GAS_PRICE_RETRY_ATTEMPTS {
        match bridge.suggest_price().await {
            Ok(price) => return Ok(price),
            Err(err) => {
                tracing::warn!(attempt, %err, "suggest_price failed");
                last_err = Some(err);
                if attempt + 1 < GAS_PRICE_RETRY_ATTEMPTS {
                    tokio::time::sleep(GAS_PRICE_RETRY_DELAY).await;
                }
            }
        }
    }
    Err(last_err.expect("loop always runs at least once"))
}

async fn resolve_gas_limit(bridge: &dyn Bridge, args: &BuildTxArgs, calldata: &[u8]) -> Result<u64, BuildError> {
    let estimated = bridge
        .estimate_gas(&args.from, &args.to, args.value, calldata)
        .await
        .map_err(BuildError::EstimateGasFailed)?;
    let inflated = estimated.saturating_mul(GAS_LIMIT_INFLATION_PERCENT) / 100;
    Ok(inflated.max(bridge.chain_config().default_gas_limit()))
}

/// Requires `balance(from) >= value + reserveGasFee` (§4.2 step 3). Logs a warning only when the
/// RPC call itself failed — the getBalance open question, resolved (§9): no warning is emitted
/// merely because the balance turned out to be insufficient or because the call succeeded.
async fn check_balance(bridge: &dyn Bridge, account: &str, value: Decimal) -> Result<(), BuildError> {
    let reserve = bridge.chain_config().reserve_gas_fee();
    let need = value + reserve;
    match bridge.get_balance(account).await {
        Ok(balance) if balance >= need => Ok(()),
        Ok(balance) => Err(BuildError::InsufficientBalance {
            have: balance.to_string(),
            need: need.to_string(),
        }),
        Err(err) => {
            tracing::warn!(account, %err, "get_balance rpc call failed");
            Err(BuildError::Bridge(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_test_utils::MockBridge;
    use router_types::{ChainConfig, ExtraArgs};

    fn chain_config() -> ChainConfig {
        ChainConfig {
            chain_id: 2,
            default_gas_limit: 0,
            plus_gas_price_percentage: 10,
            max_gas_price_fluct_percent: 20,
            confirmations: 10,
            wait_time_to_replace: 0,
            max_replace_count: 0,
            initial_height: 0,
            router_mpc: "0xmpc".into(),
            reserve_gas_fee: None,
        }
    }

    fn args() -> BuildTxArgs {
        BuildTxArgs {
            token_id: "usdc".into(),
            from: "0xmpc".into(),
            to: "0xrecipient".into(),
            swap_type: SwapType::RouterSwap,
            value: Decimal::ONE,
            bind: "0xbind".into(),
            pair_id: "pair".into(),
            input: None,
            extra: ExtraArgs::default(),
        }
    }

    fn ready_bridge() -> MockBridge {
        let bridge = MockBridge::new(chain_config());
        bridge.set_suggest_price(1000);
        bridge.set_pool_nonce(NonceTag::Pending, 7);
        bridge.set_estimate_gas(21_000);
        bridge.set_balance("0xmpc", Decimal::from(1_000_000_000_000_000_000u64));
        bridge
    }

    #[tokio::test]
    async fn resolves_all_defaults_when_extra_is_empty() {
        let bridge = ready_bridge();
        let gas_tracker = GasPriceTracker::new();
        let raw_tx = build(&bridge, &gas_tracker, args()).await.unwrap();
        assert_eq!(raw_tx.extra.nonce, Some(7));
        assert_eq!(raw_tx.extra.gas_price, Some(1100));
        assert_eq!(raw_tx.extra.gas_limit, Some(27_300));
    }

    #[tokio::test]
    async fn explicit_extra_fields_bypass_resolution() {
        let bridge = ready_bridge();
        let gas_tracker = GasPriceTracker::new();
        let mut request = args();
        request.extra = ExtraArgs {
            nonce: Some(99),
            gas_price: Some(5_000),
            gas_limit: Some(50_000),
        };
        let raw_tx = build(&bridge, &gas_tracker, request).await.unwrap();
        assert_eq!(raw_tx.extra.nonce, Some(99));
        assert_eq!(raw_tx.extra.gas_price, Some(5_000));
        assert_eq!(raw_tx.extra.gas_limit, Some(50_000));
        assert_eq!(bridge.call_count("suggest_price"), 0);
        assert_eq!(bridge.call_count("get_pool_nonce"), 0);
        assert_eq!(bridge.call_count("estimate_gas"), 0);
    }

    #[tokio::test]
    async fn rejects_caller_supplied_input_data() {
        let bridge = ready_bridge();
        let gas_tracker = GasPriceTracker::new();
        let mut request = args();
        request.input = Some(vec![1, 2, 3]);
        let err = build(&bridge, &gas_tracker, request).await.unwrap_err();
        assert!(matches!(err, BuildError::ForbiddenInputData));
    }

    #[tokio::test]
    async fn insufficient_balance_is_rejected() {
        let bridge = ready_bridge();
        bridge.set_balance("0xmpc", Decimal::ZERO);
        let gas_tracker = GasPriceTracker::new();
        let err = build(&bridge, &gas_tracker, args()).await.unwrap_err();
        assert!(matches!(err, BuildError::InsufficientBalance { .. }));
    }

    #[tokio::test]
    async fn gas_price_floor_prevents_fast_drops_across_builds() {
        let bridge = ready_bridge();
        let gas_tracker = GasPriceTracker::new();

        bridge.set_suggest_price(1000);
        let first = build(&bridge, &gas_tracker, args()).await.unwrap();
        assert_eq!(first.extra.gas_price, Some(1100));

        // Oracle crashes the price; the 20% floor clamps it to 1100 * 80 / 100 = 880.
        bridge.set_suggest_price(10);
        let second = build(&bridge, &gas_tracker, args()).await.unwrap();
        assert_eq!(second.extra.gas_price, Some(880));
    }

    #[tokio::test]
    async fn gas_limit_floors_to_chain_default_when_estimate_is_tiny() {
        let mut config = chain_config();
        config.default_gas_limit = 90_000;
        let bridge = MockBridge::new(config);
        bridge.set_suggest_price(1000);
        bridge.set_pool_nonce(NonceTag::Pending, 1);
        bridge.set_estimate_gas(100);
        bridge.set_balance("0xmpc", Decimal::from(1_000_000_000_000_000_000u64));

        let gas_tracker = GasPriceTracker::new();
        let raw_tx = build(&bridge, &gas_tracker, args()).await.unwrap();
        assert_eq!(raw_tx.extra.gas_limit, Some(90_000));
    }
}
