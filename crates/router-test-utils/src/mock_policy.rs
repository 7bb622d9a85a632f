//! A hand-written [`router_types::BlacklistPolicy`] test double.

use std::collections::HashSet;
use std::sync::Mutex;

/// A blacklist policy backed by an explicit set of `(fromChainID, toChainID, tokenID)` triples,
/// empty (nothing blacklisted) by default.
#[derive(Default)]
pub struct MockBlacklistPolicy {
    blocked: Mutex<HashSet<(u64, u64, String)>>,
}

impl MockBlacklistPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&self, from_chain_id: u64, to_chain_id: u64, token_id: impl Into<String>) {
        self.blocked.lock().unwrap().insert((from_chain_id, to_chain_id, token_id.into()));
    }
}

impl router_types::BlacklistPolicy for MockBlacklistPolicy {
    fn is_blacklisted(&self, from_chain_id: u64, to_chain_id: u64, token_id: &str) -> bool {
        self.blocked
            .lock()
            .unwrap()
            .contains(&(from_chain_id, to_chain_id, token_id.to_string()))
    }
}
