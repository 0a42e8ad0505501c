//! DEX integration for Algebra (Quickswap V3) pools.

pub mod client;
pub mod state;

pub use client::PoolClient;
pub use state::{BaseSide, PoolSnapshot, price_from_sqrt_x96};
