use url::Url;

/// Sanitize a title for safe filesystem usage.
///
/// Spaces become underscores, anything outside ASCII alphanumerics, `-` and
/// `_` becomes an underscore, runs of underscores collapse to one, leading
/// and trailing underscores are trimmed, and the result is capped at
/// `max_length` characters.
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_underscore = false;

    for c in name.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '-' {
            c
        } else {
            '_'
        };
        if mapped == '_' {
            if last_was_underscore {
                continue;
            }
            last_was_underscore = true;
        } else {
            last_was_underscore = false;
        }
        out.push(mapped);
    }

    let trimmed = out.trim_matches('_');
    trimmed.chars().take(max_length).collect()
}

/// Maximum length of the sanitized title portion of artifact names.
pub const MAX_TITLE_LENGTH: usize = 60;

/// Derive the base filename for one request's audio artifact: a UTC
/// timestamp followed by the sanitized title. Also used as the name of the
/// request's isolated output subdirectory.
pub fn audio_base_name(title: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H%M%S");
    format!("{}_{}", timestamp, sanitize_filename(title, MAX_TITLE_LENGTH))
}

/// Whether a URL belongs to the one platform with transcript support.
pub fn is_youtube_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    host == "youtube.com"
        || host == "youtu.be"
        || host.ends_with(".youtube.com")
}

/// Check if the current environment has the required external tools
pub async fn check_dependencies() -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available("yt-dlp", "--version").await {
        missing.push("yt-dlp - required for metadata, audio, and subtitle retrieval".to_string());
    }

    if !check_command_available("ffmpeg", "-version").await {
        missing.push("ffmpeg - required for audio transcoding".to_string());
    }

    missing
}

/// Check if a command is available in PATH
pub async fn check_command_available(command: &str, version_flag: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg(version_flag)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello World", 60), "Hello_World");
        assert_eq!(sanitize_filename("test/file?name", 60), "test_file_name");
        assert_eq!(sanitize_filename("  spaced  ", 60), "spaced");
        assert_eq!(sanitize_filename("a!!!b", 60), "a_b");
        assert_eq!(sanitize_filename("___", 60), "");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let long = "x".repeat(200);
        assert_eq!(sanitize_filename(&long, 60).chars().count(), 60);
    }

    #[test]
    fn test_sanitize_filename_keeps_dashes() {
        assert_eq!(sanitize_filename("multi-part-title", 60), "multi-part-title");
    }

    #[test]
    fn test_audio_base_name_shape() {
        let base = audio_base_name("Some: Video / Title");
        assert!(base.ends_with("_Some_Video_Title"), "got {}", base);
        // timestamp prefix: YYYY-MM-DD_HHMMSS
        assert_eq!(base.split('_').next().map(str::len), Some(10));
    }

    #[test]
    fn test_is_youtube_url() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_youtube_url("https://m.youtube.com/watch?v=abc"));
        assert!(!is_youtube_url("https://vimeo.com/12345"));
        assert!(!is_youtube_url("not-a-url"));
        assert!(!is_youtube_url("https://notyoutube.com/watch?v=abc"));
    }
}
