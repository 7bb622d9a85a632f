//! Hand-written [`router_types::Bridge`]/[`router_types::MpcSigner`]/[`router_types::BlacklistPolicy`]
//! test doubles shared across the relayer's crate-level test suites, in place of a
//! mocking-framework macro.

mod mock_bridge;
mod mock_mpc;
mod mock_policy;

pub use mock_bridge::{MockBridge, MockVerifyOutcome};
pub use mock_mpc::MockMpcSigner;
pub use mock_policy::MockBlacklistPolicy;
