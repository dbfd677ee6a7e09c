use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Filesystem layout for produced artifacts
    pub storage: StorageConfig,

    /// Retrieval collaborator settings
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Durable directory for audio artifacts, served under /files.
    /// Each request gets its own subdirectory.
    pub downloads_dir: PathBuf,

    /// Shared temporary area for subtitle files, cleaned per-request
    pub transcripts_tmp_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Path to the yt-dlp binary
    pub yt_dlp_path: String,

    /// Socket-level timeout passed to every yt-dlp invocation
    pub socket_timeout_secs: u64,

    /// User-Agent header sent by yt-dlp
    pub user_agent: String,

    /// Optional upstream proxy, applied to all yt-dlp invocations
    pub proxy: Option<String>,

    /// Subtitle language preference
    pub subtitles: SubtitlePreference,
}

/// The ordered two-language subtitle preference. Selection never falls back
/// to a language outside this pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitlePreference {
    pub primary: String,
    pub secondary: String,
}

impl SubtitlePreference {
    /// Preference order for the language resolver.
    pub fn codes(&self) -> [&str; 2] {
        [self.primary.as_str(), self.secondary.as_str()]
    }

    /// Preference order as owned strings, for the download request.
    pub fn request_list(&self) -> Vec<String> {
        vec![self.primary.clone(), self.secondary.clone()]
    }
}

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from("downloads"),
            transcripts_tmp_dir: PathBuf::from("transcripts_tmp"),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            socket_timeout_secs: 180,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            subtitles: SubtitlePreference::default(),
        }
    }
}

impl Default for SubtitlePreference {
    fn default() -> Self {
        Self {
            primary: "en".to_string(),
            secondary: "ro".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, a discovered file, or
    /// defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::discover_path(),
        };

        let config = match path {
            Some(path) => {
                let content = fs_err::read_to_string(&path)
                    .context("Failed to read config file")?;
                serde_yaml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Locate a config file: a local `clipscribe.yaml` wins, then the
    /// user's config directory.
    fn discover_path() -> Option<PathBuf> {
        let local = PathBuf::from("clipscribe.yaml");
        if local.exists() {
            return Some(local);
        }

        let candidate = dirs::config_dir()?.join("clipscribe").join("config.yaml");
        candidate.exists().then_some(candidate)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch.socket_timeout_secs == 0 {
            anyhow::bail!("fetch.socket_timeout_secs must be nonzero");
        }
        if self.fetch.subtitles.primary.is_empty() || self.fetch.subtitles.secondary.is_empty() {
            anyhow::bail!("both subtitle preference languages must be set");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch.subtitles.codes(), ["en", "ro"]);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.fetch.socket_timeout_secs, 180);
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        assert!(Config::load(Some(Path::new("/nonexistent/clipscribe.yaml"))).is_err());
    }
}
