//! Core data model, capability traits, and typed error kinds for the cross-chain router swap
//! relayer (§3, §6, §7).
//!
//! This crate defines the contract shared by every other crate in the workspace: the
//! `SwapRequest`/`SwapResult` data model, the `Bridge`/`MpcSigner`/`Scanner` capability traits
//! the core depends on, and the typed errors the pipeline branches on. It contains no pipeline
//! logic itself (that lives in `router-core`) and no storage implementation (`router-store`).

pub mod bridge;
pub mod chain_config;
pub mod error;
pub mod key;
pub mod mpc;
pub mod policy;
pub mod request;
pub mod result;
pub mod scanner;
pub mod status;

pub use bridge::{Bridge, BuildTxArgs, ExtraArgs, NonceTag, RawTx, SwapInfo, SwapType, TxReceipt, TxStatus};
pub use chain_config::ChainConfig;
pub use error::{BridgeError, BuildError, ReplaceError, SignBroadcastError, VerifyError};
pub use key::SwapKey;
pub use mpc::{MpcError, MpcSigner, SignedTx};
pub use policy::BlacklistPolicy;
pub use request::SwapRequest;
pub use result::SwapResult;
pub use scanner::Scanner;
pub use status::{RequestStatus, ResultStatus};
