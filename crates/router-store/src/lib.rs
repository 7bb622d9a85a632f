//! The Swap Store (§6.4): the persistent, CAS-guarded record of swap requests and results that
//! every other job in the pipeline reads from and writes to exclusively.

pub mod error;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use memory::InMemorySwapStore;
pub use store::{MatchTx, SwapStore};
