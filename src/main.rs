use anyhow::Result;
use clap::Parser;
use clipscribe::ExtractError;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod config;
mod fetch;
mod pipeline;
mod transcript;
mod utils;

use api::AppState;
use cli::Cli;
use config::Config;
use fetch::{MediaFetcher, YtDlpFetcher};
use pipeline::ExtractionPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "clipscribe=debug,tower_http=debug"
    } else {
        "clipscribe=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing tools degrade per-request, so they only warn here
    for dep in utils::check_dependencies().await {
        tracing::warn!("missing external tool: {}", dep);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(proxy) = cli.proxy {
        config.fetch.proxy = Some(proxy);
    }

    fs_err::create_dir_all(&config.storage.downloads_dir)?;
    fs_err::create_dir_all(&config.storage.transcripts_tmp_dir)?;

    let config = Arc::new(config);

    let fetcher = YtDlpFetcher::new(&config.fetch);
    if !fetcher.check_availability().await {
        tracing::warn!(
            "yt-dlp not responding at '{}'; extraction requests will fail",
            config.fetch.yt_dlp_path
        );
    }
    let fetcher: Arc<dyn MediaFetcher> = Arc::new(fetcher);

    let pipeline = Arc::new(ExtractionPipeline::new(fetcher, &config));
    let state = AppState::new(pipeline, Arc::clone(&config));
    let app = api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "clipscribe v{} listening on http://{}",
        env!("CARGO_PKG_VERSION"),
        addr
    );
    tracing::info!("health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
