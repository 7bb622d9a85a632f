//! The `Bridge` capability set (§6.1): the single narrow interface the core holds for every
//! destination (and, via [`Bridge::verify_router_swap_tx`], source) chain family.
//!
//! Following the re-architecture called for in the design notes, this is a trait object-safe
//! via `async_trait`, never a concrete struct extended per chain. The core never downcasts to a
//! concrete chain type; it only ever calls through `dyn Bridge`.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::chain_config::ChainConfig;
use crate::error::{BridgeError, VerifyError};

/// A blockhash tag understood by `get_pool_nonce`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceTag {
    Pending,
    Latest,
}

/// The structured outcome of a successful `verify_router_swap_tx` call: everything the
/// Verifier and Builder need to create and fund a [`crate::SwapResult`].
#[derive(Debug, Clone)]
pub struct SwapInfo {
    pub token: String,
    pub pair_id: String,
    pub value: Decimal,
    /// Source-chain height at which the deposit was included; `0` if unknown.
    pub height: u64,
    pub bind: String,
}

/// On-chain status of a single outbound tx hash (§6.1).
#[derive(Debug, Clone, Default)]
pub struct TxStatus {
    /// `0` means "not mined".
    pub block_height: u64,
    pub block_time: i64,
    pub confirmations: u64,
    pub receipt: Option<TxReceipt>,
}

impl TxStatus {
    /// A hash is on-chain iff it has a height and a receipt (§4.5 canonical tx selection).
    pub fn is_on_chain(&self) -> bool {
        self.block_height > 0 && self.receipt.is_some()
    }
}

/// The subset of a transaction receipt the Stabilizer inspects (§4.5 failure detection).
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub success: bool,
    /// Number of log entries emitted. Used to detect a token swap whose transfer event never
    /// fired despite a successful receipt status.
    pub log_count: usize,
}

/// Extra fields of an outbound transaction resolved (or overridden) by the Builder (§4.2/§4.3).
#[derive(Debug, Clone, Default)]
pub struct ExtraArgs {
    pub nonce: Option<u64>,
    pub gas_price: Option<u64>,
    pub gas_limit: Option<u64>,
}

/// Which kind of build is being requested, mirroring the original swap type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapType {
    RouterSwap,
}

/// Arguments to [`Bridge::build_raw_transaction`] (§4.2).
#[derive(Debug, Clone)]
pub struct BuildTxArgs {
    pub token_id: String,
    pub from: String,
    pub to: String,
    pub swap_type: SwapType,
    pub value: Decimal,
    pub bind: String,
    pub pair_id: String,
    /// Caller-supplied raw call data. Must be empty — the bridge synthesizes calldata from the
    /// structured swap info (§4.2 step 1, "the chief attack-surface guard").
    pub input: Option<Vec<u8>>,
    pub extra: ExtraArgs,
}

/// An encoded, unsigned outbound transaction plus the `Extra` the Builder resolved for it.
#[derive(Debug, Clone)]
pub struct RawTx {
    pub encoded: Vec<u8>,
    pub extra: ExtraArgs,
}

/// The per-destination-chain capability set consumed by the core (§6.1).
///
/// Implementations are out of scope for this crate (§1): production code would wrap a real
/// JSON-RPC client per chain family. Only a test double lives in this workspace
/// (`router-test-utils::MockBridge`).
///
/// The generic Swap-Out Builder algorithm (defaults resolution, gas-price adjustment, the
/// balance guard — §4.2 steps 2-3, the in-scope 25%-share component) lives in
/// `router_core::build` and calls only the primitive RPC-shaped methods below. The two
/// `encode_*` methods are the chain-family-specific, wire-level half of "build" (§4.2 steps 1
/// and 4) that the distilled spec places out of scope.
#[async_trait]
pub trait Bridge: Send + Sync {
    fn chain_config(&self) -> &ChainConfig;

    async fn suggest_price(&self) -> Result<u64, BridgeError>;

    async fn get_pool_nonce(&self, account: &str, tag: NonceTag) -> Result<u64, BridgeError>;

    /// Pure, local nonce-reservation strategy layered on top of the RPC-observed nonce
    /// (§4.2 step 2). Never performs I/O.
    fn adjust_nonce(&self, account: &str, nonce: u64) -> u64;

    async fn estimate_gas(
        &self,
        from: &str,
        to: &str,
        value: Decimal,
        data: &[u8],
    ) -> Result<u64, BridgeError>;

    async fn get_balance(&self, account: &str) -> Result<Decimal, BridgeError>;

    async fn get_erc20_balance(&self, token: &str, account: &str) -> Result<Decimal, BridgeError>;

    async fn get_transaction_status(&self, tx_hash: &str) -> Result<TxStatus, BridgeError>;

    /// Submits an already-signed, wire-encoded transaction to the network (§4.4 step 3).
    async fn broadcast_transaction(&self, signed: &[u8]) -> Result<(), BridgeError>;

    /// Verifies a source-chain deposit and, on success, returns the structured [`SwapInfo`].
    ///
    /// Callers must check the `Result` before reading any field of an `Ok` value — there is no
    /// path here that returns a `SwapInfo` alongside an error (§4.1, "error-before-info
    /// discipline").
    async fn verify_router_swap_tx(
        &self,
        tx_id: &str,
        log_index: u32,
        allow_unstable: bool,
    ) -> Result<SwapInfo, VerifyError>;

    /// Synthesizes the precise calldata for `args` from its structured swap fields (§4.2 step 1,
    /// "the chief attack-surface guard" — the caller never injects calldata of its own).
    fn encode_swap_calldata(&self, args: &BuildTxArgs) -> Vec<u8>;

    /// Wire-encodes a fully-resolved outbound transaction (§4.2 step 4). Out of scope to
    /// implement for a real chain family; the production equivalent is "Wire-level transaction
    /// encoding for any specific chain family" named in §1.
    fn encode_transaction(&self, to: &str, value: Decimal, extra: &ExtraArgs, data: &[u8]) -> Vec<u8>;

    fn big_value_threshold(&self, token: &str) -> Decimal;

    /// The on-chain contract address of the token moved by `pair_id`, if it is a token-contract
    /// swap rather than a native-coin one. `None` conditions the Stabilizer's empty-logs failure
    /// check (§4.5 "Failure detection") off for native-coin swaps, which legitimately emit no
    /// transfer event.
    fn token_contract_address(&self, pair_id: &str) -> Option<String>;
}
