//! A hand-written [`Bridge`] test double.
//!
//! Every RPC-shaped method reads from a small piece of caller-configured canned state guarded
//! by a `std::sync::Mutex`, rather than performing any real I/O. Tests arrange scenarios by
//! calling the `set_*`/`push_*` helpers before exercising a pipeline stage.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use router_types::{
    BridgeError, BuildTxArgs, ChainConfig, ExtraArgs, NonceTag, SwapInfo, TxStatus, VerifyError,
};
use rust_decimal::Decimal;

/// A cloneable stand-in for [`VerifyError`], since the real type wraps a non-`Clone`
/// [`BridgeError`]. Converted into a fresh `VerifyError` each time the mock is called.
#[derive(Debug, Clone)]
pub enum MockVerifyOutcome {
    Ok(SwapInfo),
    TxNotStable,
    TxNotFound,
    TxWithWrongValue,
    TxWithWrongPath,
    MissTokenConfig(String),
    NoUnderlyingToken(String),
    Other(String),
}

impl From<MockVerifyOutcome> for Result<SwapInfo, VerifyError> {
    fn from(outcome: MockVerifyOutcome) -> Self {
        match outcome {
            MockVerifyOutcome::Ok(info) => Ok(info),
            MockVerifyOutcome::TxNotStable => Err(VerifyError::TxNotStable),
            MockVerifyOutcome::TxNotFound => Err(VerifyError::TxNotFound),
            MockVerifyOutcome::TxWithWrongValue => Err(VerifyError::TxWithWrongValue),
            MockVerifyOutcome::TxWithWrongPath => Err(VerifyError::TxWithWrongPath),
            MockVerifyOutcome::MissTokenConfig(t) => Err(VerifyError::MissTokenConfig(t)),
            MockVerifyOutcome::NoUnderlyingToken(t) => Err(VerifyError::NoUnderlyingToken(t)),
            MockVerifyOutcome::Other(msg) => Err(VerifyError::Other(msg)),
        }
    }
}

#[derive(Default)]
struct MockState {
    suggest_price: Option<u64>,
    pool_nonce_pending: Option<u64>,
    pool_nonce_latest: Option<u64>,
    estimate_gas: Option<u64>,
    balances: HashMap<String, Decimal>,
    erc20_balances: HashMap<(String, String), Decimal>,
    tx_statuses: HashMap<String, TxStatus>,
    verify_outcomes: HashMap<(String, u32), MockVerifyOutcome>,
    big_value_threshold: Decimal,
    contract_addresses: HashMap<String, String>,
    broadcast_failure: Option<String>,
    /// Calls made to each method, for assertions that a retry loop ran the expected count of
    /// times or that a side-effecting call did/didn't happen.
    pub calls: HashMap<&'static str, u32>,
}

/// A [`router_types::Bridge`] double for one destination chain.
pub struct MockBridge {
    config: ChainConfig,
    state: Mutex<MockState>,
}

impl MockBridge {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn set_suggest_price(&self, price: u64) {
        self.state.lock().unwrap().suggest_price = Some(price);
    }

    pub fn set_pool_nonce(&self, tag: NonceTag, nonce: u64) {
        let mut state = self.state.lock().unwrap();
        match tag {
            NonceTag::Pending => state.pool_nonce_pending = Some(nonce),
            NonceTag::Latest => state.pool_nonce_latest = Some(nonce),
        }
    }

    pub fn set_estimate_gas(&self, gas: u64) {
        self.state.lock().unwrap().estimate_gas = Some(gas);
    }

    pub fn set_balance(&self, account: &str, balance: Decimal) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert(account.to_string(), balance);
    }

    pub fn set_erc20_balance(&self, token: &str, account: &str, balance: Decimal) {
        self.state
            .lock()
            .unwrap()
            .erc20_balances
            .insert((token.to_string(), account.to_string()), balance);
    }

    pub fn set_tx_status(&self, tx_hash: &str, status: TxStatus) {
        self.state
            .lock()
            .unwrap()
            .tx_statuses
            .insert(tx_hash.to_string(), status);
    }

    pub fn set_verify_outcome(&self, tx_id: &str, log_index: u32, outcome: MockVerifyOutcome) {
        self.state
            .lock()
            .unwrap()
            .verify_outcomes
            .insert((tx_id.to_string(), log_index), outcome);
    }

    pub fn set_big_value_threshold(&self, threshold: Decimal) {
        self.state.lock().unwrap().big_value_threshold = threshold;
    }

    /// Marks `pair_id` as a token-contract swap with the given on-chain contract address. A
    /// `pair_id` never passed here is treated as a native-coin swap (§4.5).
    pub fn set_token_contract_address(&self, pair_id: &str, contract_address: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .contract_addresses
            .insert(pair_id.to_string(), contract_address.into());
    }

    pub fn fail_broadcast(&self, message: impl Into<String>) {
        self.state.lock().unwrap().broadcast_failure = Some(message.into());
    }

    pub fn call_count(&self, method: &'static str) -> u32 {
        self.state.lock().unwrap().calls.get(method).copied().unwrap_or(0)
    }

    fn record_call(&self, method: &'static str) {
        *self.state.lock().unwrap().calls.entry(method).or_insert(0) += 1;
    }
}

#[async_trait]
impl router_types::Bridge for MockBridge {
    fn chain_config(&self) -> &ChainConfig {
        &self.config
    }

    async fn suggest_price(&self) -> Result<u64, BridgeError> {
        self.record_call("suggest_price");
        self.state
            .lock()
            .unwrap()
            .suggest_price
            .ok_or_else(|| BridgeError::Rpc("no suggest_price configured".into()))
    }

    async fn get_pool_nonce(&self, _account: &str, tag: NonceTag) -> Result<u64, BridgeError> {
        self.record_call("get_pool_nonce");
        let state = self.state.lock().unwrap();
        let value = match tag {
            NonceTag::Pending => state.pool_nonce_pending,
            NonceTag::Latest => state.pool_nonce_latest,
        };
        value.ok_or_else(|| BridgeError::Rpc("no pool nonce configured".into()))
    }

    fn adjust_nonce(&self, _account: &str, nonce: u64) -> u64 {
        nonce
    }

    async fn estimate_gas(
        &self,
        _from: &str,
        _to: &str,
        _value: Decimal,
        _data: &[u8],
    ) -> Result<u64, BridgeError> {
        self.record_call("estimate_gas");
        self.state
            .lock()
            .unwrap()
            .estimate_gas
            .ok_or_else(|| BridgeError::Rpc("no estimate_gas configured".into()))
    }

    async fn get_balance(&self, account: &str) -> Result<Decimal, BridgeError> {
        self.record_call("get_balance");
        self.state
            .lock()
            .unwrap()
            .balances
            .get(account)
            .copied()
            .ok_or_else(|| BridgeError::Rpc(format!("no balance configured for {account}")))
    }

    async fn get_erc20_balance(&self, token: &str, account: &str) -> Result<Decimal, BridgeError> {
        self.record_call("get_erc20_balance");
        self.state
            .lock()
            .unwrap()
            .erc20_balances
            .get(&(token.to_string(), account.to_string()))
            .copied()
            .ok_or_else(|| BridgeError::Rpc(format!("no erc20 balance configured for {account}")))
    }

    async fn get_transaction_status(&self, tx_hash: &str) -> Result<TxStatus, BridgeError> {
        self.record_call("get_transaction_status");
        Ok(self
            .state
            .lock()
            .unwrap()
            .tx_statuses
            .get(tx_hash)
            .cloned()
            .unwrap_or_default())
    }

    async fn broadcast_transaction(&self, _signed: &[u8]) -> Result<(), BridgeError> {
        self.record_call("broadcast_transaction");
        match self.state.lock().unwrap().broadcast_failure.clone() {
            Some(message) => Err(BridgeError::Rpc(message)),
            None => Ok(()),
        }
    }

    async fn verify_router_swap_tx(
        &self,
        tx_id: &str,
        log_index: u32,
        _allow_unstable: bool,
    ) -> Result<SwapInfo, VerifyError> {
        self.record_call("verify_router_swap_tx");
        let outcome = self
            .state
            .lock()
            .unwrap()
            .verify_outcomes
            .get(&(tx_id.to_string(), log_index))
            .cloned()
            .unwrap_or(MockVerifyOutcome::Other("no outcome configured".into()));
        outcome.into()
    }

    fn encode_swap_calldata(&self, _args: &BuildTxArgs) -> Vec<u8> {
        self.record_call("encode_swap_calldata");
        b"calldata".to_vec()
    }

    fn encode_transaction(
        &self,
        _to: &str,
        _value: Decimal,
        _extra: &ExtraArgs,
        _data: &[u8],
    ) -> Vec<u8> {
        self.record_call("encode_transaction");
        b"rawtx".to_vec()
    }

    fn big_value_threshold(&self, _token: &str) -> Decimal {
        self.state.lock().unwrap().big_value_threshold
    }

    fn token_contract_address(&self, pair_id: &str) -> Option<String> {
        self.state.lock().unwrap().contract_addresses.get(pair_id).cloned()
    }
}
