//! Per-destination-chain configuration consumed by the Builder, Stabilizer and Replacer (§6.1).

use serde::{Deserialize, Serialize};

/// Fields consumed from a destination bridge's chain configuration.
///
/// Mirrors the `ChainConfig` fields the distilled spec names explicitly; everything else a
/// concrete chain might need (RPC endpoints, contract addresses, …) belongs to the out-of-scope
/// Bridge implementation, not to this shared contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Floor used when the chain's gas estimate comes back implausibly low. `0` means "use the
    /// hardcoded 90 000 floor" (§4.2 step 2).
    #[serde(default)]
    pub default_gas_limit: u64,
    /// Percentage added on top of the oracle gas price (§4.3 step 2). `0` disables the bump.
    #[serde(default)]
    pub plus_gas_price_percentage: u64,
    /// Maximum percentage the oracle is allowed to *lower* the gas price relative to the last
    /// price this bridge set (§4.3 step 3). `0` disables the clamp.
    #[serde(default)]
    pub max_gas_price_fluct_percent: u64,
    /// Confirmations required before the Stabilizer promotes a result to `Stable`/`Failed`.
    pub confirmations: u64,
    /// Seconds a result may sit in `MatchTxNotStable` before the Replacer considers it stuck.
    /// `0` means "use the 900s default" (§4.6).
    #[serde(default)]
    pub wait_time_to_replace: i64,
    /// Cap on `old_swap_txs` length before the Replacer refuses further replacement. `0` means
    /// "use the default of 20".
    #[serde(default)]
    pub max_replace_count: usize,
    /// Source-chain height below which a request is rejected as `WrongPath` (pre-enabled).
    #[serde(default)]
    pub initial_height: u64,
    /// Address of the MPC-controlled outbound account on this chain.
    pub router_mpc: String,
    /// Minimum balance, in the chain's base unit, reserved for gas above the swap value
    /// (§4.2 step 3). Defaults to 10^16 if unset.
    #[serde(default)]
    pub reserve_gas_fee: Option<rust_decimal::Decimal>,
}

/// Default wait time before the Replacer considers an outbound tx stuck (§4.6).
pub const DEFAULT_WAIT_TIME_TO_REPLACE: i64 = 900;
/// Default cap on replacement count (§4.6 precondition 6).
pub const DEFAULT_MAX_REPLACE_COUNT: usize = 20;
/// Default gas limit floor when a chain config does not set one (§4.2 step 2).
pub const DEFAULT_GAS_LIMIT: u64 = 90_000;

impl ChainConfig {
    pub fn wait_time_to_replace(&self) -> i64 {
        if self.wait_time_to_replace > 0 {
            self.wait_time_to_replace
        } else {
            DEFAULT_WAIT_TIME_TO_REPLACE
        }
    }

    pub fn max_replace_count(&self) -> usize {
        if self.max_replace_count > 0 {
            self.max_replace_count
        } else {
            DEFAULT_MAX_REPLACE_COUNT
        }
    }

    pub fn default_gas_limit(&self) -> u64 {
        if self.default_gas_limit > 0 {
            self.default_gas_limit
        } else {
            DEFAULT_GAS_LIMIT
        }
    }

    pub fn reserve_gas_fee(&self) -> rust_decimal::Decimal {
        self.reserve_gas_fee
            .unwrap_or_else(|| rust_decimal::Decimal::from(10u64.pow(16)))
    }
}
