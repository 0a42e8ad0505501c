//! Core library for the liquidity-towers project.
//!
//! The loader turns the NDJSON price log into per-pair visuals, the scene
//! applies them as towers, and the monitor keeps the log fed from on-chain
//! pools.

pub mod cli;
pub mod config;
pub mod dex;
pub mod errors;
pub mod loader;
pub mod models;
pub mod monitor;
pub mod oracle;
pub mod pairs;
pub mod scene;
pub mod utils;
