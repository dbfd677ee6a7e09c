//! yt-dlp-backed implementation of the retrieval collaborator.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::{AudioCodec, FetchError, MediaFetcher, SubtitleDownload, VideoMetadata};
use crate::config::FetchConfig;
use crate::utils;

/// Drives the yt-dlp binary as a subprocess. Every invocation carries the
/// configured socket timeout, user agent, and optional proxy so no single
/// unresponsive upstream can block a worker indefinitely.
pub struct YtDlpFetcher {
    binary: String,
    socket_timeout_secs: u64,
    user_agent: String,
    proxy: Option<String>,
}

/// The slice of yt-dlp's JSON dump the subtitle step cares about.
#[derive(Debug, Deserialize)]
struct SubtitleDump {
    requested_subtitles: Option<HashMap<String, RequestedSubtitle>>,
}

#[derive(Debug, Deserialize)]
struct RequestedSubtitle {
    filepath: Option<PathBuf>,
}

impl YtDlpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            binary: config.yt_dlp_path.clone(),
            socket_timeout_secs: config.socket_timeout_secs,
            user_agent: config.user_agent.clone(),
            proxy: config.proxy.clone(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> bool {
        utils::check_command_available(&self.binary, "--version").await
    }

    fn common_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.socket_timeout_secs.to_string(),
            "--user-agent".to_string(),
            self.user_agent.clone(),
        ];
        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<std::process::Output, FetchError> {
        tracing::debug!(binary = %self.binary, ?args, "invoking yt-dlp");

        Command::new(&self.binary)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| FetchError::Launch {
                command: self.binary.clone(),
                source,
            })
    }
}

/// Distinguish "no such item" from other network/processing faults, keeping
/// only the collaborator's final error line.
fn classify_failure(stderr: &[u8]) -> FetchError {
    let stderr = String::from_utf8_lossy(stderr);
    let line = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("yt-dlp exited with an error")
        .to_string();

    if line.contains("Video unavailable")
        || line.contains("does not exist")
        || line.contains("HTTP Error 404")
    {
        FetchError::NotFound(line)
    } else {
        FetchError::Failed(line)
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, FetchError> {
        let mut args = self.common_args();
        args.extend([
            "--dump-json".to_string(),
            "--skip-download".to_string(),
            url.to_string(),
        ]);

        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(classify_failure(&output.stderr));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| FetchError::InvalidOutput(e.to_string()))
    }

    async fn download_audio(
        &self,
        url: &str,
        codec: AudioCodec,
        output_template: &Path,
    ) -> Result<(), FetchError> {
        let mut args = self.common_args();
        args.extend([
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            codec.as_str().to_string(),
            "--output".to_string(),
            output_template.to_string_lossy().into_owned(),
            url.to_string(),
        ]);

        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(classify_failure(&output.stderr));
        }
        Ok(())
    }

    async fn download_subtitles(
        &self,
        url: &str,
        languages: &[String],
        output_template: &Path,
    ) -> Result<SubtitleDownload, FetchError> {
        let mut args = self.common_args();
        args.extend([
            "--skip-download".to_string(),
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-langs".to_string(),
            languages.join(","),
            "--sub-format".to_string(),
            "vtt".to_string(),
            // --dump-json alone would simulate; --no-simulate keeps the
            // subtitle files being written while still dumping the JSON
            // that names which tracks were obtained.
            "--no-simulate".to_string(),
            "--dump-json".to_string(),
            "--output".to_string(),
            output_template.to_string_lossy().into_owned(),
            url.to_string(),
        ]);

        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(classify_failure(&output.stderr));
        }

        let files = match serde_json::from_slice::<SubtitleDump>(&output.stdout) {
            Ok(dump) => dump
                .requested_subtitles
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(lang, sub)| sub.filepath.map(|path| (lang, path)))
                .collect(),
            Err(e) => {
                // The filesystem probe fallback still works without the
                // structured response.
                tracing::warn!("could not parse subtitle listing: {}", e);
                HashMap::new()
            }
        };

        Ok(SubtitleDownload { files })
    }

    async fn transcoder_available(&self) -> bool {
        utils::check_command_available("ffmpeg", "-version").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_not_found() {
        let err = classify_failure(b"WARNING: something\nERROR: [youtube] abc: Video unavailable\n");
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[test]
    fn test_classify_other_failure() {
        let err = classify_failure(b"ERROR: unable to download webpage: timed out\n");
        assert!(matches!(err, FetchError::Failed(_)));
    }

    #[test]
    fn test_classify_empty_stderr() {
        let err = classify_failure(b"");
        assert!(matches!(err, FetchError::Failed(_)));
    }

    #[test]
    fn test_subtitle_dump_parsing() {
        let json = r#"{
            "title": "t",
            "requested_subtitles": {
                "en": {"ext": "vtt", "filepath": "/tmp/sub_x.en.vtt"},
                "ro": {"ext": "vtt"}
            }
        }"#;
        let dump: SubtitleDump = serde_json::from_str(json).unwrap();
        let subs = dump.requested_subtitles.unwrap();
        assert_eq!(
            subs["en"].filepath.as_deref(),
            Some(Path::new("/tmp/sub_x.en.vtt"))
        );
        assert!(subs["ro"].filepath.is_none());
    }
}
