//! Price-log loader.
//!
//! Fetches the NDJSON price log from disk or over HTTP and turns it into one
//! [`PairVisual`] per known pair. Every call reads the resource fresh; nothing
//! is cached between loads.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::errors::{AppError, Result};
use crate::models::PairVisual;

pub mod transform;

pub use transform::{FALLBACK_HEIGHT_USD, RADIUS_SCALE, build_visuals, parse_records};

/// Where the price log lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceLogSource {
    File(PathBuf),
    Http(Url),
}

impl FromStr for PriceLogSource {
    type Err = AppError;

    /// `http(s)://` URLs are fetched, `file://` URLs and anything else are paths.
    fn from_str(s: &str) -> Result<Self> {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Http(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::File)
                .map_err(|_| AppError::Config(format!("invalid file URL: {s}"))),
            _ => Ok(Self::File(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for PriceLogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http(url) => write!(f, "{url}"),
        }
    }
}

/// Loads pair visuals from a price log.
#[derive(Debug, Clone)]
pub struct PriceLogLoader {
    source: PriceLogSource,
    client: Client,
}

impl PriceLogLoader {
    pub fn new(source: PriceLogSource) -> Self {
        Self {
            source,
            client: Client::new(),
        }
    }

    pub fn source(&self) -> &PriceLogSource {
        &self.source
    }

    /// Read the raw log text. Any I/O or HTTP failure is returned as-is.
    pub async fn fetch_text(&self) -> Result<String> {
        match &self.source {
            PriceLogSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            PriceLogSource::Http(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?;
                Ok(response.text().await?)
            }
        }
    }

    /// Fetch, parse and transform. Structural failures abort with no partial result.
    pub async fn load(&self) -> Result<Vec<PairVisual>> {
        let text = self.fetch_text().await?;
        let records = parse_records(&text)?;
        debug!(source = %self.source, records = records.len(), "[LOAD] parsed price log");
        let visuals = build_visuals(records);
        info!(source = %self.source, pairs = visuals.len(), "[LOAD] visuals ready");
        Ok(visuals)
    }
}
