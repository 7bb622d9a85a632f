//! Configuration for the relayer binary (§2.1 ambient stack).
//!
//! Mirrors the facilitator's `Config::load` pattern: a `--config` CLI flag (env-fallback)
//! resolves a JSON file path; fields not present in the file fall back to `serde(default)`.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use router_types::ChainConfig;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "router-relayer")]
#[command(about = "Cross-chain router swap relayer")]
struct CliArgs {
    /// Path to the JSON configuration file.
    #[arg(long, short, env = "CONFIG", default_value = "config.json")]
    config: PathBuf,
}

/// Per-job pacing: how often a pass runs, and how far back it looks (§4.1/§4.5/§4.6 horizons,
/// §5 `restIntervalIn{Verify,Stable,Replace}Job`).
#[derive(Debug, Clone, Deserialize)]
pub struct JobTiming {
    #[serde(default = "job_timing_defaults::default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "job_timing_defaults::default_horizon_secs")]
    pub horizon_secs: i64,
}

mod job_timing_defaults {
    pub fn default_interval_secs() -> u64 {
        10
    }
    pub fn default_horizon_secs() -> i64 {
        24 * 3600
    }
}

impl Default for JobTiming {
    fn default() -> Self {
        Self {
            interval_secs: job_timing_defaults::default_interval_secs(),
            horizon_secs: job_timing_defaults::default_horizon_secs(),
        }
    }
}

/// One configured destination chain: its `Bridge`-facing parameters plus this process's pacing
/// for the four jobs that act on it.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainEntry {
    #[serde(flatten)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub verify: JobTiming,
    #[serde(default)]
    pub swap_out: JobTiming,
    #[serde(default)]
    pub stabilize: JobTiming,
    /// The Replacer has no horizon (it scans every not-yet-stable result, §4.6); only the
    /// interval is meaningful here.
    #[serde(default)]
    pub replace: JobTiming,
}

/// Admin/metrics bind address. The registry is in scope (§2.1); the HTTP endpoint that exports
/// it is not, so this is currently unused by `main` but kept for a future admin surface.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "metrics_defaults::default_host")]
    pub host: IpAddr,
    #[serde(default = "metrics_defaults::default_port")]
    pub port: u16,
}

mod metrics_defaults {
    use std::env;
    use std::net::IpAddr;

    pub fn default_host() -> IpAddr {
        env::var("METRICS_HOST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED))
    }

    pub fn default_port() -> u16 {
        env::var("METRICS_PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(9090)
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            host: metrics_defaults::default_host(),
            port: metrics_defaults::default_port(),
        }
    }
}

/// One blocked `(fromChainID, toChainID, tokenID)` triple (§4.1 policy step 1).
#[derive(Debug, Clone, Deserialize)]
pub struct BlacklistEntry {
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    pub token_id: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub chains: Vec<ChainEntry>,
    #[serde(default)]
    pub blacklist: Vec<BlacklistEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Config {
    /// `--config <path>` (or `$CONFIG`, or `./config.json`), then field-level `serde(default)`.
    pub fn load() -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        Self::load_from_path(&cli_args.config)
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
        Ok(serde_json::from_str(&content)?)
    }
}
