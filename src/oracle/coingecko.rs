use crate::errors::{AppError, Result};
use crate::pairs::UsdRate;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub const COINGECKO_API: &str = "https://api.coingecko.com/api/v3";

/// USD rates for the non-stablecoin quote assets, as fetched for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsdRates {
    pub eth_usd: Option<f64>,
    pub pol_usd: Option<f64>,
}

impl UsdRates {
    pub fn get(&self, rate: UsdRate) -> Option<f64> {
        match rate {
            UsdRate::Unit => Some(1.0),
            UsdRate::EthUsd => self.eth_usd,
            UsdRate::PolUsd => self.pol_usd,
        }
    }
}

/// Client for CoinGecko's `simple/price` endpoint.
#[derive(Debug, Clone)]
pub struct CoinGecko {
    base_url: String,
    client: Client,
}

impl CoinGecko {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// USD price of a CoinGecko asset id.
    pub async fn usd_price(&self, id: &str) -> Result<f64> {
        let mut url = Url::parse(&format!(
            "{}/simple/price",
            self.base_url.trim_end_matches('/')
        ))?;
        url.query_pairs_mut()
            .append_pair("ids", id)
            .append_pair("vs_currencies", "usd");

        let body: Value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(id, response = %body, "[ORACLE] CoinGecko response");
        extract_usd(&body, id)
    }

    /// Fetch ETH and POL concurrently. A failed fetch leaves that rate empty.
    pub async fn usd_rates(&self) -> UsdRates {
        let (eth, pol) = futures::join!(
            self.rate_or_none(UsdRate::EthUsd),
            self.rate_or_none(UsdRate::PolUsd)
        );
        UsdRates {
            eth_usd: eth,
            pol_usd: pol,
        }
    }

    async fn rate_or_none(&self, rate: UsdRate) -> Option<f64> {
        let id = rate.coingecko_id()?;
        match self.usd_price(id).await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(id, error = %e, "[ORACLE] failed to fetch USD price");
                None
            }
        }
    }
}

/// Pull `body[id].usd` out of a `simple/price` response.
fn extract_usd(body: &Value, id: &str) -> Result<f64> {
    body.get(id)
        .and_then(|asset| asset.get("usd"))
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::Other(format!("no USD price for {id} in response")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_usd_price() {
        let body: Value = serde_json::from_str(r#"{"ethereum":{"usd":3012.5}}"#).unwrap();
        assert_eq!(extract_usd(&body, "ethereum").unwrap(), 3012.5);
    }

    #[test]
    fn integer_price_is_accepted() {
        let body: Value = serde_json::from_str(r#"{"ethereum":{"usd":3000}}"#).unwrap();
        assert_eq!(extract_usd(&body, "ethereum").unwrap(), 3000.0);
    }

    #[test]
    fn missing_asset_is_an_error() {
        let body: Value = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(extract_usd(&body, "ethereum"), Err(AppError::Other(_))));
    }

    #[test]
    fn rates_lookup_by_pair_kind() {
        let rates = UsdRates {
            eth_usd: Some(3000.0),
            pol_usd: None,
        };
        assert_eq!(rates.get(UsdRate::Unit), Some(1.0));
        assert_eq!(rates.get(UsdRate::EthUsd), Some(3000.0));
        assert_eq!(rates.get(UsdRate::PolUsd), None);
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_empty_rates() {
        // Port 9 on loopback refuses connections.
        let gecko = CoinGecko::new("http://127.0.0.1:9");
        assert_eq!(gecko.usd_rates().await, UsdRates::default());
    }
}
