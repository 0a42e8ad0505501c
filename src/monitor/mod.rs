//! Pool price monitor.
//!
//! Every cycle fetches USD rates, samples each configured pool and appends one
//! line per pool to the price log that the tower loader reads back.

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::{MonitorConfig, PoolTarget};
use crate::dex::{BaseSide, PoolClient};
use crate::errors::Result;
use crate::oracle::{CoinGecko, UsdRates};

pub mod entry;

pub use entry::{LogEntry, PriceLogWriter, TokenDecimals};

pub struct Monitor {
    config: MonitorConfig,
    client: PoolClient,
    oracle: CoinGecko,
    writer: PriceLogWriter,
}

impl Monitor {
    /// Connect to the RPC node and log the base/USD token metadata.
    pub async fn connect(config: MonitorConfig) -> Result<Self> {
        let client = PoolClient::new(&config.rpc_url)?;
        let chain_id = client.chain_id().await?;
        info!(%chain_id, "[MONITOR] connected to RPC");

        let (base_symbol, base_decimals) = client.token_info(config.base_token).await?;
        let (usd_symbol, usd_decimals) = client.token_info(config.usd_token).await?;
        info!(symbol = %base_symbol, decimals = base_decimals, "[MONITOR] base token");
        info!(symbol = %usd_symbol, decimals = usd_decimals, "[MONITOR] USD token");

        let oracle = CoinGecko::new(config.coingecko_url.clone());
        let writer = PriceLogWriter::new(config.price_log.clone());
        Ok(Self {
            config,
            client,
            oracle,
            writer,
        })
    }

    /// One sampling pass. Returns how many entries were written.
    ///
    /// A pool that fails is logged and skipped; the others still get written.
    pub async fn poll_once(&self) -> usize {
        let rates = self.oracle.usd_rates().await;
        info!(eth_usd = ?rates.eth_usd, pol_usd = ?rates.pol_usd, "[MONITOR] USD rates");

        let mut written = 0;
        for target in &self.config.pools {
            match self.sample(target, &rates).await {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(e) => error!(pair = target.pair.name, error = %e, "[MONITOR] price fetch failed"),
            }
        }
        written
    }

    /// Run forever, one pass per poll interval.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        loop {
            ticker.tick().await;
            let written = self.poll_once().await;
            info!(written, path = %self.writer.path().display(), "[MONITOR] cycle done");
        }
    }

    async fn sample(&self, target: &PoolTarget, rates: &UsdRates) -> Result<bool> {
        let pair = target.pair;
        let Some(pool_addr) = target.address else {
            error!(pair = pair.name, env = pair.pool_env, "[MONITOR] pool address not configured");
            return Ok(false);
        };

        let snapshot = self.client.snapshot(pool_addr).await?;
        let base = self.config.base_token;
        let quote_per_base = snapshot.quote_per_base(base);
        match snapshot.base_side(base) {
            BaseSide::Token0 | BaseSide::Token1 => info!(
                pair = pair.name,
                "[MONITOR] 1 {} = {:.6} {}",
                pair.base,
                quote_per_base,
                pair.quote
            ),
            BaseSide::Absent => warn!(
                pair = pair.name,
                "[MONITOR] neither token0 nor token1 matches {}",
                pair.base
            ),
        }

        let entry = LogEntry::new(pair, &snapshot, base, rates, Utc::now());
        self.writer.append(&entry).await?;
        Ok(true)
    }
}
