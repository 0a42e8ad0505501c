//! Shared data structures used throughout the application.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One observation read back from the price log.
///
/// Only one of the `price_*_per_sht` fields is populated per record, depending
/// on the pair's quote asset. Extra fields written by the monitor (pool address,
/// decimals, sqrt price) are ignored. A line without `pair` or `timestamp`
/// still parses and is skipped downstream; a timestamp that is present but
/// unreadable makes the line malformed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceRecord {
    #[serde(default)]
    pub pair: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub price_usdc_per_sht: Option<f64>,
    pub price_eth_per_sht: Option<f64>,
    pub price_pol_per_sht: Option<f64>,
    /// Raw pool liquidity in the smallest native unit.
    pub liquidity: Option<f64>,
    pub eth_usd: Option<f64>,
    pub pol_usd: Option<f64>,
}

impl PriceRecord {
    /// First populated price field, in USDC, ETH, POL order.
    pub fn price(&self) -> Option<f64> {
        self.price_usdc_per_sht
            .or(self.price_eth_per_sht)
            .or(self.price_pol_per_sht)
    }
}

/// Offset-carrying forms tried after RFC 3339.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];

/// Offset-less forms, read as UTC. A trailing `Z` is stripped first.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Accepts RFC 3339, minute-precision and date-only ISO-8601 timestamps.
///
/// Forms without an offset are read as UTC; a bare date is midnight UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Some(ts) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(ts.with_timezone(&Utc));
    }
    let naive = raw.strip_suffix(['Z', 'z']).unwrap_or(raw);
    if let Some(ts) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
    {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Render-ready descriptor for one pair, produced fresh on every load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairVisual {
    pub pair: String,
    /// Fixed lane position along the x axis.
    pub x: f64,
    /// RGB colour, `0xRRGGBB`.
    pub color: u32,
    /// Price in quote units per base token, as logged.
    pub price: f64,
    pub height_usd: f64,
    pub liquidity_usd: f64,
    pub radius: f64,
    /// Set when no USD conversion was available and the fallback height was used.
    pub height_is_fallback: bool,
}
