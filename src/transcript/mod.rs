//! Transcript normalization: cue parsing, adjacent dedup, language fallback.

pub mod vtt;

pub use vtt::parse;

/// Join cue segments into final plain text, collapsing consecutive
/// exact-duplicate segments to a single occurrence. Streaming caption
/// sources re-emit the same line across overlapping timing windows, so only
/// adjacent repeats are collapsed; non-adjacent repeats are real.
pub fn normalize(segments: &[String]) -> String {
    let mut kept: Vec<&str> = Vec::with_capacity(segments.len());
    for segment in segments {
        if kept.last().copied() != Some(segment.as_str()) {
            kept.push(segment);
        }
    }
    kept.join("\n")
}

/// Select the first language from `preference` reported available.
///
/// Deterministic and side-effect-free; never falls back to a language
/// outside the preference list. The caller decides what "available" means
/// (a structured download response, or a filesystem probe).
pub fn resolve_language<'a, F>(preference: &[&'a str], is_available: F) -> Option<&'a str>
where
    F: Fn(&str) -> bool,
{
    preference.iter().copied().find(|lang| is_available(lang))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_collapses_adjacent_duplicates() {
        assert_eq!(normalize(&segs(&["a", "a", "b", "a"])), "a\nb\na");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(&[]), "");
    }

    #[test]
    fn test_normalize_preserves_non_adjacent_repeats() {
        assert_eq!(normalize(&segs(&["x", "y", "x"])), "x\ny\nx");
    }

    #[test]
    fn test_resolve_prefers_primary() {
        let found = resolve_language(&["en", "ro"], |lang| lang == "en" || lang == "ro");
        assert_eq!(found, Some("en"));
    }

    #[test]
    fn test_resolve_falls_back_to_secondary() {
        let found = resolve_language(&["en", "ro"], |lang| lang == "ro");
        assert_eq!(found, Some("ro"));
    }

    #[test]
    fn test_resolve_none_available() {
        let found = resolve_language(&["en", "ro"], |_| false);
        assert_eq!(found, None);
    }

    #[test]
    fn test_resolve_never_substitutes_unlisted() {
        // "de" is available but not in the preference list.
        let found = resolve_language(&["en", "ro"], |lang| lang == "de");
        assert_eq!(found, None);
    }

    #[test]
    fn test_parse_then_normalize_is_pure() {
        let raw = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nsame\n\n00:00:01.000 --> 00:00:02.000\nsame\n";
        let first = normalize(&parse(raw));
        let second = normalize(&parse(raw));
        assert_eq!(first, "same");
        assert_eq!(first, second);
    }
}
