//! Errors the [`crate::SwapStore`] can return.

use router_types::{RequestStatus, ResultStatus, SwapKey};

/// Every mutation below is a conditional update on the row's expected prior status (§5, "all
/// transitions are conditional updates (compare-and-set on old status)"). A `StatusMismatch`
/// means another job already advanced the row past the caller's stale read — the caller should
/// simply drop the record and pick it up again on its next pass, not retry in a loop.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no swap request for key {0}")]
    RequestNotFound(SwapKey),
    #[error("no swap result for key {0}")]
    ResultNotFound(SwapKey),
    #[error("a swap result already exists for key {0}")]
    ResultAlreadyExists(SwapKey),
    #[error("request {key} expected status {expected:?}, found {actual:?}")]
    RequestStatusMismatch {
        key: SwapKey,
        expected: RequestStatus,
        actual: RequestStatus,
    },
    #[error("result {key} expected status {expected:?}, found {actual:?}")]
    ResultStatusMismatch {
        key: SwapKey,
        expected: ResultStatus,
        actual: ResultStatus,
    },
}
