use anyhow::Result;
use clap::Parser;
use liquidity_towers::{
    cli::{Cli, Command},
    config::{MonitorConfig, RenderConfig},
    loader::PriceLogLoader,
    monitor::Monitor,
    scene::Scene,
    utils,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let cli = Cli::parse();
    if let Some(render) = cli.command.render_config() {
        return render_scene(render?).await;
    }

    if let Command::Monitor { once } = cli.command {
        let config = MonitorConfig::from_env()?;
        tracing::info!(
            pools = config.pools.iter().filter(|p| p.address.is_some()).count(),
            interval_secs = config.poll_interval.as_secs(),
            log = %config.price_log.display(),
            "[INIT] monitor starting"
        );
        let monitor = Monitor::connect(config).await?;
        if once {
            let written = monitor.poll_once().await;
            tracing::info!(written, "[MONITOR] single pass done");
        } else {
            monitor.run().await;
        }
    }
    Ok(())
}

async fn render_scene(config: RenderConfig) -> Result<()> {
    let loader = PriceLogLoader::new(config.source);
    let mut scene = Scene::new();
    tracing::info!(source = %loader.source(), "[INIT] rendering towers");

    // First load is fatal on failure; later reloads keep the last good scene.
    let visuals = loader.load().await?;
    scene.apply(&visuals);
    println!("{}", serde_json::to_string(&scene)?);

    let Some(period) = config.watch else {
        return Ok(());
    };
    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        match loader.load().await {
            Ok(visuals) => {
                let diff = scene.apply(&visuals);
                if !diff.is_empty() {
                    tracing::info!(
                        added = ?diff.added,
                        removed = ?diff.removed,
                        updated = ?diff.updated,
                        "[SCENE] towers changed"
                    );
                    println!("{}", serde_json::to_string(&scene)?);
                }
            }
            Err(e) => tracing::warn!(error = %e, "[LOAD] reload failed, keeping previous scene"),
        }
    }
}
