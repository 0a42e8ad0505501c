//! Configuration loader and application settings.
//!
//! Values come from the environment (a `.env` file is loaded first by the
//! binary). Loading goes through a lookup closure so tests never touch the
//! process environment.

use crate::errors::{AppError, Result};
use crate::loader::PriceLogSource;
use crate::oracle::COINGECKO_API;
use crate::pairs::PairSpec;
use ethers::types::Address;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PRICE_LOG: &str = "data/price_log.jsonl";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Settings for loading and emitting the tower scene.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub source: PriceLogSource,
    /// Reload period; `None` loads once.
    pub watch: Option<Duration>,
}

/// A pool the monitor samples.
#[derive(Debug, Clone)]
pub struct PoolTarget {
    pub pair: &'static PairSpec,
    /// `None` when the pool's env var is unset; the monitor skips it.
    pub address: Option<Address>,
}

/// Settings for the pool price monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// RPC endpoint for the Polygon node.
    pub rpc_url: String,
    /// Token every pair is priced in terms of (SHT).
    pub base_token: Address,
    /// USD stablecoin, logged at startup.
    pub usd_token: Address,
    pub pools: Vec<PoolTarget>,
    pub poll_interval: Duration,
    pub coingecko_url: String,
    pub price_log: PathBuf,
}

impl MonitorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("Set {key} env var")))
        };

        let rpc_url = required("RPC_URL")?;
        let base_token = parse_address("SHT_ADDRESS", &required("SHT_ADDRESS")?)?;
        let usd_token = parse_address("USDC_ADDRESS", &required("USDC_ADDRESS")?)?;

        let pools = PairSpec::all()
            .iter()
            .map(|pair| -> Result<PoolTarget> {
                let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
                let address = match set(pair.pool_env) {
                    Some(raw) => Some(parse_address(pair.pool_env, &raw)?),
                    None => match set(pair.legacy_pool_env) {
                        Some(raw) => Some(parse_address(pair.legacy_pool_env, &raw)?),
                        None => None,
                    },
                };
                Ok(PoolTarget { pair, address })
            })
            .collect::<Result<Vec<_>>>()?;

        let poll_interval_secs = match lookup("POLL_INTERVAL_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("POLL_INTERVAL_SECS must be whole seconds: {e}"))
            })?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };
        if poll_interval_secs == 0 {
            return Err(AppError::Config("POLL_INTERVAL_SECS must be positive".into()));
        }

        Ok(Self {
            rpc_url,
            base_token,
            usd_token,
            pools,
            poll_interval: Duration::from_secs(poll_interval_secs),
            coingecko_url: lookup("COINGECKO_URL").unwrap_or_else(|| COINGECKO_API.into()),
            price_log: lookup("PRICE_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PRICE_LOG)),
        })
    }
}

fn parse_address(key: &str, raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| AppError::Config(format!("{key} is not a valid address: {e}")))
}
