//! The event Scanner capability (§6.3). Declared for completeness at the crate boundary; no
//! real chain implementation lives in this crate (§1, "Event scanning... out of scope").

use async_trait::async_trait;

use crate::request::SwapRequest;

/// Turns source-chain log events into `Unverified` [`SwapRequest`] rows. The Verifier tolerates
/// lag and duplicates from this source since requests are idempotent by primary key.
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn scan(&self) -> Result<Vec<SwapRequest>, Box<dyn std::error::Error + Send + Sync>>;
}
