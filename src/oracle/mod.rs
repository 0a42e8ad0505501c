//! Off-chain USD price sources.
//!
//! Only CoinGecko's public API is wired in; it supplies the ETH and POL rates
//! the monitor stamps on non-stablecoin pairs.

pub mod coingecko;

pub use coingecko::{COINGECKO_API, CoinGecko, UsdRates};
