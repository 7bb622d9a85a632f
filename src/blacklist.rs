//! The in-tree [`router_types::BlacklistPolicy`] implementation: a fixed, config-loaded set of
//! blocked `(fromChainID, toChainID, tokenID)` triples (§4.1 policy step 1).
//!
//! Unlike `Bridge`/`MpcSigner`, a blacklist is admin-managed data, not a chain RPC client, so it
//! is loaded straight out of [`Config`](crate::config::Config) rather than left to a deployment
//! to register, the same way the teacher loads its provider allowlist from config.

use std::collections::HashSet;

use router_types::BlacklistPolicy;

use crate::config::Config;

pub struct ConfigBlacklistPolicy {
    blocked: HashSet<(u64, u64, String)>,
}

impl ConfigBlacklistPolicy {
    pub fn from_config(config: &Config) -> Self {
        let blocked = config
            .blacklist
            .iter()
            .map(|entry| (entry.from_chain_id, entry.to_chain_id, entry.token_id.clone()))
            .collect();
        Self { blocked }
    }
}

impl BlacklistPolicy for ConfigBlacklistPolicy {
    fn is_blacklisted(&self, from_chain_id: u64, to_chain_id: u64, token_id: &str) -> bool {
        self.blocked.contains(&(from_chain_id, to_chain_id, token_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlacklistEntry;

    #[test]
    fn blocked_triple_matches_exactly() {
        let mut config = Config::default();
        config.blacklist.push(BlacklistEntry {
            from_chain_id: 1,
            to_chain_id: 2,
            token_id: "usdc".into(),
        });
        let policy = ConfigBlacklistPolicy::from_config(&config);

        assert!(policy.is_blacklisted(1, 2, "usdc"));
        assert!(!policy.is_blacklisted(1, 2, "usdt"));
        assert!(!policy.is_blacklisted(1, 3, "usdc"));
    }
}
