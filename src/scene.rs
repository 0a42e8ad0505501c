//! Scene state consumed by the renderer.
//!
//! The loader hands over an immutable list of visuals; [`Scene::apply`] swaps
//! out every tower for the new set and reports what changed.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::models::PairVisual;

/// Depth (z) units per unit of quote price.
pub const PRICE_DEPTH_SCALE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    /// Vertical offset from the tower's base.
    pub offset_y: f64,
}

/// One cylinder with its two labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tower {
    pub pair: String,
    pub color: u32,
    pub radius: f64,
    pub height: f64,
    /// Centre of the cylinder, `[x, y, z]`.
    pub position: [f64; 3],
    pub price_label: Label,
    pub base_label: Label,
}

impl Tower {
    pub fn from_visual(visual: &PairVisual) -> Self {
        let height = visual.height_usd;
        Self {
            pair: visual.pair.clone(),
            color: visual.color,
            radius: visual.radius,
            height,
            position: [visual.x, height / 2.0, visual.price * PRICE_DEPTH_SCALE],
            price_label: Label {
                text: format!("{}\n${height:.4} USD", visual.pair),
                offset_y: height + 1.5,
            },
            base_label: Label {
                text: format!("Liquidity: ${}", format_whole_usd(visual.liquidity_usd)),
                offset_y: -0.5,
            },
        }
    }
}

/// Pairs touched by one [`Scene::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SceneDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
}

impl SceneDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    towers: Vec<Tower>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    /// Replace all towers with those built from `visuals`.
    pub fn apply(&mut self, visuals: &[PairVisual]) -> SceneDiff {
        let mut previous: HashMap<String, Tower> = self
            .towers
            .drain(..)
            .map(|t| (t.pair.clone(), t))
            .collect();
        let mut diff = SceneDiff::default();

        for visual in visuals {
            let tower = Tower::from_visual(visual);
            match previous.remove(&tower.pair) {
                None => diff.added.push(tower.pair.clone()),
                Some(old) if old == tower => diff.unchanged.push(tower.pair.clone()),
                Some(_) => diff.updated.push(tower.pair.clone()),
            }
            self.towers.push(tower);
        }

        diff.removed = previous.into_keys().collect();
        diff.removed.sort();
        debug!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            updated = diff.updated.len(),
            "[SCENE] towers replaced"
        );
        diff
    }
}

/// Round to whole dollars and group thousands, e.g. `1234567.8` -> `1,234,568`.
fn format_whole_usd(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visual(pair: &str, x: f64, price: f64, height: f64, liquidity: f64) -> PairVisual {
        PairVisual {
            pair: pair.to_string(),
            x,
            color: 0x00ffff,
            price,
            height_usd: height,
            liquidity_usd: liquidity,
            radius: (liquidity + 1.0).log10(),
            height_is_fallback: false,
        }
    }

    #[test]
    fn tower_geometry_and_labels() {
        let tower = Tower::from_visual(&visual("SHT/USDC", -20.0, 1.23, 1.23, 1_234_567.8));
        assert_eq!(tower.position, [-20.0, 0.615, 61.5]);
        assert_eq!(tower.price_label.text, "SHT/USDC\n$1.2300 USD");
        assert_eq!(tower.price_label.offset_y, 1.23 + 1.5);
        assert_eq!(tower.base_label.text, "Liquidity: $1,234,568");
        assert_eq!(tower.base_label.offset_y, -0.5);
    }

    #[test]
    fn whole_usd_formatting() {
        assert_eq!(format_whole_usd(0.0), "0");
        assert_eq!(format_whole_usd(999.4), "999");
        assert_eq!(format_whole_usd(1000.0), "1,000");
        assert_eq!(format_whole_usd(3000.0), "3,000");
        assert_eq!(format_whole_usd(-12345.0), "-12,345");
    }

    #[test]
    fn apply_reports_additions_then_no_change() {
        let visuals = vec![
            visual("SHT/USDC", -20.0, 1.0, 1.0, 2.0),
            visual("SHT/ETH", 0.0, 0.5, 1500.0, 3000.0),
        ];
        let mut scene = Scene::new();
        let first = scene.apply(&visuals);
        assert_eq!(first.added, vec!["SHT/USDC", "SHT/ETH"]);
        assert!(!first.is_empty());

        let second = scene.apply(&visuals);
        assert!(second.is_empty());
        assert_eq!(second.unchanged.len(), 2);
        assert_eq!(scene.towers().len(), 2);
    }

    #[test]
    fn apply_replaces_previous_towers() {
        let mut scene = Scene::new();
        scene.apply(&[
            visual("SHT/USDC", -20.0, 1.0, 1.0, 2.0),
            visual("SHT/POL", 20.0, 2.0, 0.5, 10.0),
        ]);
        let diff = scene.apply(&[
            visual("SHT/USDC", -20.0, 1.1, 1.1, 2.0),
            visual("SHT/ETH", 0.0, 0.5, 1500.0, 3000.0),
        ]);
        assert_eq!(diff.updated, vec!["SHT/USDC"]);
        assert_eq!(diff.added, vec!["SHT/ETH"]);
        assert_eq!(diff.removed, vec!["SHT/POL"]);
        let pairs: Vec<&str> = scene.towers().iter().map(|t| t.pair.as_str()).collect();
        assert_eq!(pairs, vec!["SHT/USDC", "SHT/ETH"]);
    }

    #[test]
    fn empty_visuals_clear_the_scene() {
        let mut scene = Scene::new();
        scene.apply(&[visual("SHT/USDC", -20.0, 1.0, 1.0, 2.0)]);
        let diff = scene.apply(&[]);
        assert_eq!(diff.removed, vec!["SHT/USDC"]);
        assert!(scene.towers().is_empty());
    }
}
