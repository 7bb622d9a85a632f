//! [`SwapRequest`]: the inbound side of a swap, as observed by the Scanner and classified by
//! the Verifier.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::key::SwapKey;
use crate::status::RequestStatus;

/// An observed deposit awaiting or undergoing verification (§3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub key: SwapKey,
    pub to_chain_id: u64,
    pub token_id: String,
    /// Sender on the source chain.
    pub from: String,
    /// Recipient on the destination chain.
    pub bind: String,
    /// Transferred value as an exact decimal, never a lossy float.
    pub value: Decimal,
    /// Block height on the source chain at which the deposit was observed. `0` means unknown.
    pub height: u64,
    /// Unix seconds at which the Scanner first recorded this request.
    pub timestamp: i64,
    pub status: RequestStatus,
    /// Unix seconds of the most recent status transition.
    pub status_timestamp: i64,
    pub memo: Option<String>,
}

impl SwapRequest {
    /// Constructs a freshly-scanned request in `Unverified` status.
    pub fn new_unverified(
        key: SwapKey,
        to_chain_id: u64,
        token_id: impl Into<String>,
        from: impl Into<String>,
        bind: impl Into<String>,
        value: Decimal,
        height: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            key,
            to_chain_id,
            token_id: token_id.into(),
            from: from.into(),
            bind: bind.into(),
            value,
            height,
            timestamp,
            status: RequestStatus::Unverified,
            status_timestamp: timestamp,
            memo: None,
        }
    }
}
