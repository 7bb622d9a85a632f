//! Per-`(chain, account)` nonce-assignment locking (design decision in §9: option (a), a
//! lock held across "read pending nonce -> adjust -> assign to result row").

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes the nonce-consuming critical section per destination-chain MPC account so two
/// concurrent Verifier passes can never observe and assign the same pool nonce.
#[derive(Default)]
pub struct NonceLocks {
    locks: DashMap<(u64, String), Arc<Mutex<()>>>,
}

impl NonceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `(chain_id, account)`, creating it on first use. Holding the
    /// returned guard across an `.await` is the point: it is an `OwnedMutexGuard` precisely so
    /// it outlives the borrow of `self`.
    pub async fn lock(&self, chain_id: u64, account: &str) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry((chain_id, account.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }
}
