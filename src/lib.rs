//! The `router-relayer` binary's own modules: config loading, the chain extension point,
//! metrics, shutdown signalling, logging, and job wiring. The actual pipeline lives in
//! `router-core`; this crate only assembles it into a running process.

pub mod blacklist;
pub mod chain_registry;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod run;
pub mod sig_down;
