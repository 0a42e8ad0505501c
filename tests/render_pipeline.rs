//! Integration test: price log -> visuals -> scene.

use liquidity_towers::{
    loader::{FALLBACK_HEIGHT_USD, PriceLogLoader, PriceLogSource},
    scene::Scene,
};
use std::path::PathBuf;

fn fixture_loader() -> PriceLogLoader {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/price_log.jsonl");
    PriceLogLoader::new(PriceLogSource::File(path))
}

#[tokio::test]
async fn fixture_log_builds_three_towers() {
    let visuals = fixture_loader().load().await.expect("fixture should load");
    let pairs: Vec<&str> = visuals.iter().map(|v| v.pair.as_str()).collect();
    assert_eq!(pairs, vec!["SHT/USDC", "SHT/ETH", "SHT/POL"]);

    let usdc = &visuals[0];
    assert_eq!(usdc.price, 1.23);
    assert!((usdc.liquidity_usd - 2.0).abs() < 1e-9);
    assert!((usdc.radius - 3f64.log10()).abs() < 1e-9);

    let eth = &visuals[1];
    assert!((eth.height_usd - 1500.0).abs() < 1e-9);
    assert!((eth.radius - 3001f64.log10()).abs() < 1e-9);

    let pol = &visuals[2];
    assert!(pol.height_is_fallback);
    assert_eq!(pol.height_usd, FALLBACK_HEIGHT_USD);
    assert_eq!(pol.radius, 0.0);
}

#[tokio::test]
async fn reloading_unchanged_log_leaves_scene_untouched() {
    let loader = fixture_loader();
    let mut scene = Scene::new();

    let first = scene.apply(&loader.load().await.unwrap());
    assert_eq!(first.added.len(), 3);

    let second = scene.apply(&loader.load().await.unwrap());
    assert!(second.is_empty());
    assert_eq!(second.unchanged.len(), 3);
}

#[tokio::test]
async fn scene_serializes_for_the_renderer() {
    let mut scene = Scene::new();
    scene.apply(&fixture_loader().load().await.unwrap());

    let json = serde_json::to_value(&scene).unwrap();
    let towers = json["towers"].as_array().expect("towers array");
    assert_eq!(towers.len(), 3);
    assert_eq!(towers[1]["pair"], "SHT/ETH");
    assert_eq!(towers[1]["position"][1], 750.0);
    assert_eq!(towers[1]["price_label"]["text"], "SHT/ETH\n$1500.0000 USD");
    assert_eq!(towers[1]["base_label"]["text"], "Liquidity: $3,000");
}
