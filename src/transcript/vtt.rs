//! WebVTT cue parsing.
//!
//! Converts raw timed-text content into an ordered sequence of cleaned text
//! segments, one per cue. Deduplication is left to the caller so the parser
//! stays independent of the dedup policy.

use once_cell::sync::Lazy;
use regex::Regex;

/// Inline markup: `<c>`, `<c.colorCCCCCC>`, `<00:00:01.000>`, `</c>`, etc.
static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Header prefixes discarded during parsing, matched case-insensitively.
const HEADER_PREFIXES: &[&str] = &["kind:", "language:", "style", "note", "region"];

/// Parse raw WebVTT content into cleaned per-cue text segments.
///
/// Lines are classified as blank (cue boundary), header metadata, cue time
/// range markers, cue index numbers, or cue text. Text lines are stripped of
/// inline markup, entity-decoded, and joined per cue with single spaces.
/// Content with no recognizable cues yields an empty vector; malformed
/// markup degrades to best-effort stripping and never fails.
pub fn parse(raw: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut in_cue_text = false;

    for raw_line in raw.lines() {
        let line = raw_line.trim();

        if line.is_empty() {
            if in_cue_text {
                flush(&mut buffer, &mut segments);
            }
            buffer.clear();
            in_cue_text = false;
            continue;
        }

        if is_header_line(line) {
            in_cue_text = false;
            continue;
        }

        if line.contains("-->") {
            flush(&mut buffer, &mut segments);
            in_cue_text = true;
            continue;
        }

        // A bare number before any cue text is a cue index.
        if !in_cue_text && is_cue_index(line) {
            continue;
        }

        let text = decode_entities(&TAG_PATTERN.replace_all(line, ""));
        let text = text.trim();
        if !text.is_empty() {
            buffer.push(text.to_string());
        }
    }

    flush(&mut buffer, &mut segments);
    segments
}

fn flush(buffer: &mut Vec<String>, segments: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }
    let segment = buffer.join(" ").trim().to_string();
    if !segment.is_empty() {
        segments.push(segment);
    }
    buffer.clear();
}

fn is_header_line(line: &str) -> bool {
    if line.eq_ignore_ascii_case("webvtt") {
        return true;
    }
    let lowered = line.to_ascii_lowercase();
    HEADER_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

fn is_cue_index(line: &str) -> bool {
    line.chars().all(|c| c.is_ascii_digit())
}

/// Decode the small fixed set of named entities the format uses.
/// `&amp;` goes last so double-escaped entities decode only one level.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
