//! Pure part of the loader: NDJSON text in, pair visuals out.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::errors::{AppError, Result};
use crate::models::{PairVisual, PriceRecord};
use crate::pairs::PairSpec;

/// Tower height used when a pair's price cannot be expressed in USD.
pub const FALLBACK_HEIGHT_USD: f64 = 5.0;

/// Display scale applied to `log10(liquidity_usd + 1)`.
pub const RADIUS_SCALE: f64 = 1.0;

/// Parse every non-blank line as a `PriceRecord`. One bad line fails the lot.
pub fn parse_records(text: &str) -> Result<Vec<PriceRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| AppError::Json {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Keep the latest record per pair. On equal timestamps the later line wins.
///
/// Records without a timestamp can't be ordered and are dropped.
pub fn latest_per_pair(records: Vec<PriceRecord>) -> HashMap<String, PriceRecord> {
    let mut latest: HashMap<String, PriceRecord> = HashMap::new();
    for record in records {
        if record.timestamp.is_none() {
            debug!(pair = %record.pair, "[LOAD] skipping record without timestamp");
            continue;
        }
        let newer = latest
            .get(&record.pair)
            .is_none_or(|current| record.timestamp >= current.timestamp);
        if newer {
            latest.insert(record.pair.clone(), record);
        }
    }
    latest
}

/// Convert one record into a visual, or `None` if the pair can't be drawn.
pub fn visualize(record: &PriceRecord) -> Option<PairVisual> {
    let Some(spec) = PairSpec::lookup(&record.pair) else {
        debug!(pair = %record.pair, "[LOAD] skipping unknown pair");
        return None;
    };
    let (Some(price), Some(liquidity)) = (record.price(), record.liquidity) else {
        debug!(pair = %record.pair, "[LOAD] skipping record without price or liquidity");
        return None;
    };

    let rate = spec.usd_rate(record);
    let height_usd = match rate {
        Some(rate) => price * rate,
        None => {
            warn!(
                pair = spec.name,
                rate_field = spec.usd_rate.field_name().unwrap_or_default(),
                "[LOAD] missing price conversion, using fallback height"
            );
            FALLBACK_HEIGHT_USD
        }
    };
    info!(pair = spec.name, price, height_usd, "[LOAD] height");

    let liquidity_usd = match rate {
        Some(rate) => liquidity / 10f64.powi(spec.quote_decimals as i32) * rate,
        None => 0.0,
    };
    let liquidity_usd = if liquidity_usd < 0.0 {
        warn!(pair = spec.name, liquidity, "[LOAD] negative liquidity clamped to zero");
        0.0
    } else {
        liquidity_usd
    };
    let radius = (liquidity_usd + 1.0).log10() * RADIUS_SCALE;
    info!(
        pair = spec.name,
        liquidity_usd = format_args!("{liquidity_usd:.2}"),
        radius = format_args!("{radius:.2}"),
        "[LOAD] radius"
    );

    Some(PairVisual {
        pair: spec.name.to_string(),
        x: spec.x,
        color: spec.color,
        price,
        height_usd,
        liquidity_usd,
        radius,
        height_is_fallback: rate.is_none(),
    })
}

/// Full transform: latest record per pair, converted, ordered by lane.
pub fn build_visuals(records: Vec<PriceRecord>) -> Vec<PairVisual> {
    let mut visuals: Vec<PairVisual> = latest_per_pair(records)
        .values()
        .filter_map(visualize)
        .collect();
    visuals.sort_by(|a, b| a.x.total_cmp(&b.x));
    visuals
}
