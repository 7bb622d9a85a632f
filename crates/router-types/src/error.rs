//! Typed error kinds for the swap execution pipeline (§7).
//!
//! The Verifier branches on these by exhaustive match, never by string comparison or sentinel
//! equality — the re-architecture called for in the design notes.

use thiserror::Error;

/// Errors a [`crate::bridge::Bridge`] RPC call can raise.
///
/// Kept separate from [`VerifyError`]/[`SwapError`] because it crosses the core/collaborator
/// boundary: every other error kind below is produced *by* the core after consulting a bridge,
/// whereas this one is produced *by* the bridge itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("rpc call failed: {0}")]
    Rpc(String),
    #[error("no bridge configured for chain id {0}")]
    NoBridgeForChainId(u64),
}

/// Outcome of [`crate::bridge::Bridge::verify_router_swap_tx`] (§4.1 policy step 2).
///
/// `TxNotStable`/`TxNotFound` are retryable: the Verifier leaves the request's status
/// untouched on either and re-examines it next pass (§4.1 "Retryable").
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("swap in blacklist")]
    SwapInBlacklist,
    #[error("source tx seen but not yet enough confirmations")]
    TxNotStable,
    #[error("source tx not yet visible")]
    TxNotFound,
    #[error("transferred value violates policy")]
    TxWithWrongValue,
    #[error("swap path not permitted")]
    TxWithWrongPath,
    #[error("no token configuration for token id {0}")]
    MissTokenConfig(String),
    #[error("token {0} has no underlying asset on the destination chain")]
    NoUnderlyingToken(String),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error("verification failed: {0}")]
    Other(String),
}

impl VerifyError {
    /// True for the two errors the Verifier must treat as "try again next pass" rather than as
    /// a terminal rejection (§4.1).
    pub fn is_retryable(&self) -> bool {
        matches!(self, VerifyError::TxNotStable | VerifyError::TxNotFound)
    }
}

/// Errors the Swap-Out Builder can raise (§4.2). Never partially committed: a `BuildError`
/// leaves the upstream [`crate::status::RequestStatus::Verified`] / the result's current status
/// untouched, to be retried on the next Swap-Out driver pass.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("build router swap tx without token id")]
    MissingTokenId,
    #[error("forbid empty sender")]
    MissingFrom,
    #[error("forbid build raw swap tx with input data")]
    ForbiddenInputData,
    #[error("swap type not supported for routed building")]
    UnsupportedSwapType,
    #[error("estimate gas failed: {0}")]
    EstimateGasFailed(#[source] BridgeError),
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: String, need: String },
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Errors the Signer/Broadcaster can raise (§4.4).
#[derive(Debug, Error)]
pub enum SignBroadcastError {
    #[error("mpc signer failed: {0}")]
    Sign(String),
    #[error("broadcast failed: {0}")]
    Broadcast(String),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Errors the Replacer can raise when a precondition fails (§4.6). Each variant names the
/// precondition that failed; a failed precondition aborts the replacement as a no-op rather
/// than propagating to the caller as a hard fault.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplaceError {
    #[error("swap result has no result row with the expected key")]
    ResultNotFound,
    #[error("swap without swaptx")]
    NoSwapTxYet,
    #[error("swap result status is not match-tx-not-stable")]
    NotInReplaceableStatus,
    #[error("swaptx already has a block height")]
    AlreadyObserved,
    #[error("swaptx already exists on-chain")]
    AlreadyOnChain,
    #[error("cannot replace swap with nonce ({ours}) lower than latest pool nonce ({latest})")]
    NonceAlreadyConsumed { ours: u64, latest: u64 },
    #[error("replaced swap too many times (> {max})")]
    TooManyReplacements { max: usize },
}
