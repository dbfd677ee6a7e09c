//! Extraction orchestration: metadata lookup, optional audio extraction,
//! optional transcript extraction, assembled as one best-effort unit of work.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, SubtitlePreference};
use crate::fetch::{AudioCodec, MediaFetcher};
use crate::transcript;
use crate::utils;
use crate::ExtractError;

/// One extraction request. Immutable once created.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub url: String,
    pub audio: bool,
    pub transcript: bool,
    pub audio_codec: AudioCodec,
}

/// Best-effort extraction outcome. Populated fields represent partial
/// success; `error` holds the first failure observed and does not imply the
/// other fields are absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionResult {
    pub video_url: String,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub audio_server_path: Option<PathBuf>,
    pub audio_download_url: Option<String>,
    pub transcript_text: Option<String>,
    pub transcript_language: Option<String>,
    pub error: Option<String>,
}

impl ExtractionResult {
    fn new(url: &str) -> Self {
        Self {
            video_url: url.to_string(),
            ..Default::default()
        }
    }

    /// First error wins; later steps never overwrite it.
    fn record_error(&mut self, error: &ExtractError) {
        if self.error.is_none() {
            self.error = Some(error.to_string());
        }
    }
}

struct AudioArtifact {
    server_path: PathBuf,
    download_url: String,
}

/// Sequences the extraction steps for one request. Steps after the metadata
/// lookup are independent: a failure in one is recorded and the next
/// requested step still runs.
pub struct ExtractionPipeline {
    fetcher: Arc<dyn MediaFetcher>,
    downloads_dir: PathBuf,
    transcripts_tmp_dir: PathBuf,
    languages: SubtitlePreference,
}

impl ExtractionPipeline {
    pub fn new(fetcher: Arc<dyn MediaFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            downloads_dir: config.storage.downloads_dir.clone(),
            transcripts_tmp_dir: config.storage.transcripts_tmp_dir.clone(),
            languages: config.fetch.subtitles.clone(),
        }
    }

    /// Run one request to completion. Never fails past this boundary: every
    /// step-local fault is converted into the result's error text.
    pub async fn run(&self, request: &ExtractionRequest) -> ExtractionResult {
        let mut result = ExtractionResult::new(&request.url);

        tracing::info!(
            url = %request.url,
            audio = request.audio,
            transcript = request.transcript,
            "starting extraction"
        );

        // Title and author name every later artifact, so a metadata failure
        // aborts the whole request.
        let metadata = match self.fetcher.fetch_metadata(&request.url).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(url = %request.url, "metadata fetch failed: {}", e);
                result.error =
                    Some(ExtractError::MetadataFetchFailed(e.to_string()).to_string());
                return result;
            }
        };

        let title = metadata
            .title
            .unwrap_or_else(|| unique_placeholder("untitled"));
        let channel = metadata
            .uploader
            .or(metadata.channel)
            .unwrap_or_else(|| unique_placeholder("unknown_channel"));
        result.title = Some(title.clone());
        result.channel = Some(channel);

        if request.audio {
            match self
                .extract_audio(&request.url, request.audio_codec, &title)
                .await
            {
                Ok(artifact) => {
                    result.audio_server_path = Some(artifact.server_path);
                    result.audio_download_url = Some(artifact.download_url);
                }
                Err(e) => {
                    tracing::warn!(url = %request.url, "audio step failed: {}", e);
                    result.record_error(&e);
                }
            }
        }

        if request.transcript {
            if !utils::is_youtube_url(&request.url) {
                result.record_error(&ExtractError::TranscriptUnsupported);
            } else {
                let temp_base = format!("sub_{}", Uuid::new_v4().simple());
                let outcome = self.extract_transcript(&request.url, &temp_base).await;
                // Temporary subtitle files live for at most one request,
                // regardless of which exit path the step took.
                self.cleanup_transcript_artifacts(&temp_base);

                match outcome {
                    Ok((text, language)) => {
                        result.transcript_text = Some(text);
                        result.transcript_language = Some(language);
                    }
                    Err(e) => {
                        tracing::warn!(url = %request.url, "transcript step failed: {}", e);
                        result.record_error(&e);
                    }
                }
            }
        }

        result
    }

    /// Download and transcode the audio track into an isolated per-request
    /// subdirectory, then verify the expected file landed.
    async fn extract_audio(
        &self,
        url: &str,
        codec: AudioCodec,
        title: &str,
    ) -> Result<AudioArtifact, ExtractError> {
        if !self.fetcher.transcoder_available().await {
            return Err(ExtractError::TranscodeUnavailable);
        }

        let base = utils::audio_base_name(title);
        let dir = self.downloads_dir.join(&base);
        fs_err::create_dir_all(&dir)
            .map_err(|e| ExtractError::AudioDownloadFailed(e.to_string()))?;

        let template = dir.join(format!("{base}.%(ext)s"));
        self.fetcher
            .download_audio(url, codec, &template)
            .await
            .map_err(|e| ExtractError::AudioDownloadFailed(e.to_string()))?;

        let filename = format!("{base}.{}", codec.as_str());
        let server_path = dir.join(&filename);
        if !server_path.exists() {
            return Err(ExtractError::AudioArtifactMissing(
                server_path.display().to_string(),
            ));
        }

        let download_url = format!(
            "/files/{}/{}",
            urlencoding::encode(&base),
            urlencoding::encode(&filename)
        );

        Ok(AudioArtifact {
            server_path,
            download_url,
        })
    }

    /// Fetch subtitle tracks under a per-request temporary basename, resolve
    /// the language actually obtained, and normalize its cues.
    async fn extract_transcript(
        &self,
        url: &str,
        temp_base: &str,
    ) -> Result<(String, String), ExtractError> {
        let template = self.transcripts_tmp_dir.join(temp_base);
        let download = self
            .fetcher
            .download_subtitles(url, &self.languages.request_list(), &template)
            .await
            .map_err(|e| ExtractError::SubtitleDownloadFailed(e.to_string()))?;

        let preference = self.languages.codes();

        // The collaborator's structured response names what it fetched; the
        // filesystem probe covers the case where that listing is absent or
        // incomplete.
        let language =
            transcript::resolve_language(&preference, |lang| download.files.contains_key(lang))
                .or_else(|| {
                    transcript::resolve_language(&preference, |lang| {
                        self.probe_path(temp_base, lang).exists()
                    })
                });

        let Some(language) = language else {
            return Err(ExtractError::NoSubtitlesAvailable);
        };

        let path = download
            .files
            .get(language)
            .cloned()
            .unwrap_or_else(|| self.probe_path(temp_base, language));

        let raw = fs_err::read_to_string(&path)
            .map_err(|e| ExtractError::SubtitleDownloadFailed(e.to_string()))?;

        let text = transcript::normalize(&transcript::parse(&raw));
        Ok((text, language.to_string()))
    }

    /// Expected on-disk location for one language's subtitle file.
    fn probe_path(&self, temp_base: &str, lang: &str) -> PathBuf {
        self.transcripts_tmp_dir
            .join(format!("{temp_base}.{lang}.vtt"))
    }

    /// Remove every temporary file carrying this request's basename. A
    /// cleanup failure is logged, never escalated.
    fn cleanup_transcript_artifacts(&self, temp_base: &str) {
        let entries = match fs_err::read_dir(&self.transcripts_tmp_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("could not scan transcript temp dir: {}", e);
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(temp_base) {
                continue;
            }
            if let Err(e) = fs_err::remove_file(entry.path()) {
                tracing::warn!("failed to remove temporary subtitle file {}: {}", name, e);
            }
        }
    }
}

/// Arbitrary unique filler for absent metadata; not a stable identifier.
fn unique_placeholder(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}
