//! The retrieval collaborator seam.
//!
//! All network work goes through a `MediaFetcher`: metadata lookup, audio
//! download with transcode, and subtitle download. The production
//! implementation drives the yt-dlp binary; tests substitute a mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod ytdlp;

pub use ytdlp::YtDlpFetcher;

/// Structured metadata returned by a metadata-only lookup.
///
/// Field names follow the collaborator's JSON output; anything absent stays
/// `None` and the orchestrator supplies placeholders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
}

/// Audio codecs the transcode step can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    #[default]
    Mp3,
    M4a,
    Wav,
    Flac,
    Ogg,
}

impl AudioCodec {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::M4a => "m4a",
            AudioCodec::Wav => "wav",
            AudioCodec::Flac => "flac",
            AudioCodec::Ogg => "ogg",
        }
    }
}

/// Which subtitle tracks a download actually obtained, keyed by language
/// code. Ephemeral; valid only for the request that produced it.
#[derive(Debug, Clone, Default)]
pub struct SubtitleDownload {
    pub files: HashMap<String, PathBuf>,
}

/// Failures reported by the retrieval collaborator.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no such video: {0}")]
    NotFound(String),

    #[error("{0}")]
    Failed(String),

    #[error("unreadable collaborator output: {0}")]
    InvalidOutput(String),
}

/// Trait for the external metadata / audio / subtitle retrieval capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch title and author metadata without downloading anything.
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, FetchError>;

    /// Download and transcode the audio track into `output_template`,
    /// a path ending in the collaborator's extension placeholder.
    async fn download_audio(
        &self,
        url: &str,
        codec: AudioCodec,
        output_template: &Path,
    ) -> Result<(), FetchError>;

    /// Download subtitle tracks for the given languages, writing files under
    /// `output_template` and reporting which languages were obtained.
    async fn download_subtitles(
        &self,
        url: &str,
        languages: &[String],
        output_template: &Path,
    ) -> Result<SubtitleDownload, FetchError>;

    /// Probe whether the audio transcoding capability is present.
    async fn transcoder_available(&self) -> bool;
}
