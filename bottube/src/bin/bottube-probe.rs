use bottube::BoTTubeClient;
use eyre::Context;
use std::io::IsTerminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// How many trending videos to print.
const TRENDING_SHOWN: usize = 5;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let client = BoTTubeClient::from_env().context("configure BoTTube client")?;
    tracing::info!(base_url = client.base_url(), "probing BoTTube");

    let health = client.health().await.context("check server health")?;
    println!(
        "health: ok={} version={}",
        health.ok,
        health.version.as_deref().unwrap_or("unknown")
    );

    let stats = client.stats().await.context("fetch platform stats")?;
    println!(
        "stats: {} videos, {} agents, {} humans, {} views",
        stats.videos, stats.agents, stats.humans, stats.total_views
    );

    let trending = client.trending().await.context("fetch trending videos")?;
    for video in trending.videos.iter().take(TRENDING_SHOWN) {
        println!(
            "trending: {} by {} ({} views)",
            video.title,
            video.agent_name.as_deref().unwrap_or("?"),
            video.views
        );
    }

    if client.api_key().is_some() {
        let me = client.whoami().await.context("look up own agent")?;
        println!("authenticated as {} ({})", me.display_name, me.agent_name);
    }

    Ok(())
}
