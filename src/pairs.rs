//! Registry of the trading pairs the towers know how to draw.
//!
//! Each pair carries its lane, colour and the data needed to express its price
//! and liquidity in USD, so conversion is a table lookup instead of per-pair
//! branching.

use crate::models::PriceRecord;

/// Where a pair's quote-to-USD rate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsdRate {
    /// Quote asset is a USD stablecoin; rate is 1.
    Unit,
    /// `eth_usd` field of the record.
    EthUsd,
    /// `pol_usd` field of the record.
    PolUsd,
}

impl UsdRate {
    /// Record field name holding the rate, if any.
    pub fn field_name(self) -> Option<&'static str> {
        match self {
            UsdRate::Unit => None,
            UsdRate::EthUsd => Some("eth_usd"),
            UsdRate::PolUsd => Some("pol_usd"),
        }
    }

    /// CoinGecko asset id used by the monitor to fetch the rate.
    pub fn coingecko_id(self) -> Option<&'static str> {
        match self {
            UsdRate::Unit => None,
            UsdRate::EthUsd => Some("ethereum"),
            UsdRate::PolUsd => Some("polygon-ecosystem-token"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairSpec {
    /// Pair identifier as logged, e.g. `SHT/USDC`.
    pub name: &'static str,
    pub base: &'static str,
    pub quote: &'static str,
    pub x: f64,
    pub color: u32,
    /// Decimals of the asset the pool's liquidity is denominated in.
    pub quote_decimals: u32,
    pub usd_rate: UsdRate,
    /// Env var holding the pool address for the monitor.
    pub pool_env: &'static str,
    /// Older spelling of `pool_env`, still honoured when `pool_env` is unset.
    pub legacy_pool_env: &'static str,
}

static PAIRS: [PairSpec; 3] = [
    PairSpec {
        name: "SHT/USDC",
        base: "SHT",
        quote: "USDC",
        x: -20.0,
        color: 0x00ffff,
        quote_decimals: 6,
        usd_rate: UsdRate::Unit,
        pool_env: "QUICKSWAP_POOL_SHT_USDC",
        legacy_pool_env: "Quickswap_Algebra_V3_POOL_SHT-USDC_ADDRESS",
    },
    PairSpec {
        name: "SHT/ETH",
        base: "SHT",
        quote: "ETH",
        x: 0.0,
        color: 0xcc3300,
        quote_decimals: 18,
        usd_rate: UsdRate::EthUsd,
        pool_env: "QUICKSWAP_POOL_SHT_ETH",
        legacy_pool_env: "Quickswap_Algebra_V3_POOL_SHT-ETH_ADDRESS",
    },
    PairSpec {
        name: "SHT/POL",
        base: "SHT",
        quote: "POL",
        x: 20.0,
        color: 0x4b0082,
        quote_decimals: 18,
        usd_rate: UsdRate::PolUsd,
        pool_env: "QUICKSWAP_POOL_SHT_POL",
        legacy_pool_env: "Quickswap_Algebra_V3_POOL_SHT-POL_ADDRESS",
    },
];

impl PairSpec {
    pub fn all() -> &'static [PairSpec] {
        &PAIRS
    }

    pub fn lookup(pair: &str) -> Option<&'static PairSpec> {
        PAIRS.iter().find(|p| p.name == pair)
    }

    /// Quote-to-USD rate for this pair on the given record.
    ///
    /// Rates that are missing, non-finite or not strictly positive count as
    /// absent; the monitor historically wrote a negative sentinel on fetch
    /// failure.
    pub fn usd_rate(&self, record: &PriceRecord) -> Option<f64> {
        let rate = match self.usd_rate {
            UsdRate::Unit => return Some(1.0),
            UsdRate::EthUsd => record.eth_usd,
            UsdRate::PolUsd => record.pol_usd,
        }?;
        (rate.is_finite() && rate > 0.0).then_some(rate)
    }

    /// `price_<base>_per_<quote>` key used in the log.
    pub fn base_per_quote_key(&self) -> String {
        format!(
            "price_{}_per_{}",
            self.base.to_lowercase(),
            self.quote.to_lowercase()
        )
    }

    /// `price_<quote>_per_<base>` key used in the log.
    pub fn quote_per_base_key(&self) -> String {
        format!(
            "price_{}_per_{}",
            self.quote.to_lowercase(),
            self.base.to_lowercase()
        )
    }
}
