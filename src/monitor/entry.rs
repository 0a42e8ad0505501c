use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use ethers::utils::to_checksum;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::dex::PoolSnapshot;
use crate::dex::state::invert;
use crate::errors::Result;
use crate::oracle::UsdRates;
use crate::pairs::{PairSpec, UsdRate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenDecimals {
    pub token0: u8,
    pub token1: u8,
}

/// One line of the price log as written by the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub pair: String,
    /// `price_<base>_per_<quote>` and `price_<quote>_per_<base>`.
    #[serde(flatten)]
    pub prices: BTreeMap<String, f64>,
    pub pool_address: String,
    pub decimals: TokenDecimals,
    /// Decimal string; the value can exceed what JSON readers hold exactly.
    pub sqrt_price_x96: String,
    pub liquidity: Option<u128>,
    pub eth_usd: Option<f64>,
    pub pol_usd: Option<f64>,
}

impl LogEntry {
    pub fn new(
        pair: &PairSpec,
        snapshot: &PoolSnapshot,
        base_token: ethers::types::Address,
        rates: &UsdRates,
        at: DateTime<Utc>,
    ) -> Self {
        let quote_per_base = snapshot.quote_per_base(base_token);
        let mut prices = BTreeMap::new();
        prices.insert(pair.base_per_quote_key(), invert(quote_per_base));
        prices.insert(pair.quote_per_base_key(), quote_per_base);

        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Micros, true),
            pair: pair.name.to_string(),
            prices,
            pool_address: to_checksum(&snapshot.address, None),
            decimals: TokenDecimals {
                token0: snapshot.token0_decimals,
                token1: snapshot.token1_decimals,
            },
            sqrt_price_x96: snapshot.sqrt_price_x96.to_string(),
            liquidity: snapshot.liquidity,
            eth_usd: rate_for(pair, UsdRate::EthUsd, rates),
            pol_usd: rate_for(pair, UsdRate::PolUsd, rates),
        }
    }
}

/// The pair's own rate when it is stamped in `field`, else `None`.
fn rate_for(pair: &PairSpec, field: UsdRate, rates: &UsdRates) -> Option<f64> {
    if pair.usd_rate == field {
        rates.get(field)
    } else {
        None
    }
}

/// Append-only NDJSON price log.
#[derive(Debug, Clone)]
pub struct PriceLogWriter {
    path: PathBuf,
}

impl PriceLogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single line, creating the file and its directory if needed.
    pub async fn append(&self, entry: &LogEntry) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
