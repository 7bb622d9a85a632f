//! Process-wide structured logging (§2.1 ambient stack).
//!
//! A plain `tracing-subscriber` `EnvFilter` rather than the full OpenTelemetry pipeline the
//! facilitator uses for its HTTP surface — this binary has no span to export to a collector,
//! only background job passes, so stdout logging driven by `RUST_LOG` is the simpler fit.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
