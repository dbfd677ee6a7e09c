use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "clipscribe",
    about = "Extract video metadata, audio tracks, and plain-text transcripts over HTTP",
    version,
    long_about = "An HTTP service that wraps yt-dlp to fetch video metadata, extract audio \
tracks, and normalize subtitle data into plain-text transcripts. Produced audio artifacts \
are served back under /files."
)]
pub struct Cli {
    /// Config file path (defaults to ./clipscribe.yaml, then the user config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the configured bind address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Override the configured bind port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Upstream proxy applied to all retrieval requests
    #[arg(long, env = "CLIPSCRIBE_PROXY", value_name = "URL")]
    pub proxy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
