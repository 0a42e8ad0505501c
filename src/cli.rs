//! Command-line interface.

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_PRICE_LOG, RenderConfig};
use crate::errors::Result;

#[derive(Debug, Parser)]
#[command(name = "towers", version, about = "Liquidity tower scene builder and pool monitor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the price log and print the tower scene as JSON.
    Render {
        /// Path or http(s) URL of the NDJSON price log.
        #[arg(long, env = "PRICE_LOG", default_value = DEFAULT_PRICE_LOG)]
        source: String,
        /// Reload every N seconds and print the scene whenever it changes.
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
    /// Sample the configured pools and append to the price log.
    Monitor {
        /// Run a single sampling pass and exit.
        #[arg(long)]
        once: bool,
    },
}

impl Command {
    /// Build the render settings. `None` for non-render commands.
    pub fn render_config(&self) -> Option<Result<RenderConfig>> {
        match self {
            Command::Render { source, watch } => Some(source.parse().map(|source| RenderConfig {
                source,
                watch: watch.filter(|secs| *secs > 0).map(Duration::from_secs),
            })),
            Command::Monitor { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::PriceLogSource;

    #[test]
    fn render_with_watch() {
        let cli = Cli::try_parse_from(["towers", "render", "--source", "log.jsonl", "--watch", "5"])
            .expect("args should parse");
        let cfg = cli.command.render_config().unwrap().unwrap();
        assert_eq!(cfg.source, PriceLogSource::File("log.jsonl".into()));
        assert_eq!(cfg.watch, Some(Duration::from_secs(5)));
    }

    #[test]
    fn zero_watch_means_once() {
        let cli = Cli::try_parse_from(["towers", "render", "--source", "log.jsonl", "--watch", "0"])
            .unwrap();
        assert_eq!(cli.command.render_config().unwrap().unwrap().watch, None);
    }

    #[test]
    fn monitor_once() {
        let cli = Cli::try_parse_from(["towers", "monitor", "--once"]).unwrap();
        assert!(matches!(cli.command, Command::Monitor { once: true }));
        assert!(cli.command.render_config().is_none());
    }
}
