//! The swap execution pipeline (§4): Verifier, Builder, Signer/Broadcaster, Stabilizer, Replacer.
//!
//! Each stage is a plain struct with a `run_pass(now)` method; `job::run_job` turns a pass into
//! a recurring, cancellable task. No stage holds cross-stage state directly — every handoff goes
//! through the shared [`router_store::SwapStore`].

pub mod broadcast;
pub mod build;
pub mod job;
pub mod nonce;
pub mod replace;
pub mod stabilize;
pub mod swap_out;
pub mod verify;

pub use broadcast::{sign_and_broadcast, sign_and_broadcast_replacement};
pub use build::{build, GasPriceTracker};
pub use job::run_job;
pub use nonce::NonceLocks;
pub use replace::Replacer;
pub use stabilize::Stabilizer;
pub use swap_out::SwapOutDriver;
pub use verify::Verifier;
