//! Clipscribe - an HTTP service for extracting video metadata, audio tracks,
//! and plain-text transcripts
//!
//! This library wraps yt-dlp to fetch metadata, download audio, and retrieve
//! subtitle tracks, then normalizes WebVTT captions into deduplicated plain
//! text. The HTTP surface exposes a single best-effort extraction endpoint
//! plus static serving of produced audio artifacts.

pub mod api;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod pipeline;
pub mod transcript;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use fetch::{AudioCodec, MediaFetcher, VideoMetadata, YtDlpFetcher};
pub use pipeline::{ExtractionPipeline, ExtractionRequest, ExtractionResult};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Step-local failures recorded on an extraction result.
///
/// Only metadata failure aborts a request; every other variant is recorded
/// as free text on the result while the remaining steps still run.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("metadata fetch failed: {0}")]
    MetadataFetchFailed(String),

    #[error("ffmpeg not found; audio extraction requires ffmpeg on PATH")]
    TranscodeUnavailable,

    #[error("audio extraction failed: {0}")]
    AudioDownloadFailed(String),

    #[error("audio file missing after download: {0}")]
    AudioArtifactMissing(String),

    #[error("subtitle download failed: {0}")]
    SubtitleDownloadFailed(String),

    #[error("no subtitles available")]
    NoSubtitlesAvailable,

    #[error("transcript extraction is only supported for YouTube sources")]
    TranscriptUnsupported,
}
