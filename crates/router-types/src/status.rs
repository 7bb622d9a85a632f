//! Status enums driving the two state machines described in the swap execution pipeline.

use serde::{Deserialize, Serialize};

/// Status of a [`crate::SwapRequest`] as it moves through the Verifier (§4.1).
///
/// `Unverified` is the only non-terminal status besides `BigValue`; every other variant is
/// terminal once reached (invariant 6: a terminal request status never regresses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    /// Freshly scanned, not yet examined by the Verifier.
    Unverified,
    /// Passed verification; a [`crate::SwapResult`] has been created for it.
    Verified,
    /// The outbound side has reached a terminal [`ResultStatus`]; kept distinct from `Verified`
    /// only for operator-facing reporting, the Verifier itself never writes this value.
    Swapped,
    /// Exceeds the admin-review value threshold; held until moved to `Verified` out-of-band.
    BigValue,
    /// Rejected by the (fromChain, toChain, token) blacklist.
    Blacklisted,
    /// The bridge-specific verification reported a wrong transferred amount.
    WrongValue,
    /// The bridge-specific verification reported a disallowed swap path.
    WrongPath,
    /// No token configuration exists for the observed token id.
    MissTokenConfig,
    /// The configured token has no underlying asset on the destination chain.
    NoUnderlyingToken,
    /// Verification failed for a reason with no dedicated bucket.
    VerifyFailed,
}

impl RequestStatus {
    /// Terminal statuses never regress (invariant 6); `BigValue` is the one admin-reviewable
    /// status that is not terminal, since an operator promotes it to `Verified`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Unverified | RequestStatus::BigValue)
    }
}

/// Status of a [`crate::SwapResult`] as it moves through Builder/Signer/Stabilizer/Replacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultStatus {
    /// Created by the Verifier; no outbound tx has been built yet.
    MatchEmpty,
    /// An outbound tx has been signed and broadcast but has not reached the confirmation
    /// threshold (or has not been observed on-chain at all).
    MatchTxNotStable,
    /// Terminal: the canonical outbound tx reached the required confirmations with a
    /// successful receipt.
    Stable,
    /// Terminal: the canonical outbound tx was included but its receipt indicates failure.
    Failed,
}

impl ResultStatus {
    /// Terminal results are never modified again (invariant 5).
    pub fn is_terminal(self) -> bool {
        matches!(self, ResultStatus::Stable | ResultStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unverified_and_big_value_are_non_terminal_requests() {
        assert!(!RequestStatus::Unverified.is_terminal());
        assert!(!RequestStatus::BigValue.is_terminal());
        assert!(RequestStatus::Verified.is_terminal());
        assert!(RequestStatus::Blacklisted.is_terminal());
    }

    #[test]
    fn only_stable_and_failed_are_terminal_results() {
        assert!(!ResultStatus::MatchEmpty.is_terminal());
        assert!(!ResultStatus::MatchTxNotStable.is_terminal());
        assert!(ResultStatus::Stable.is_terminal());
        assert!(ResultStatus::Failed.is_terminal());
    }
}
