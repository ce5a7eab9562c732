//! WebVTT caption parsing and caption track selection.

use crate::agent::format_seconds;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// A single timed caption.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionCue {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
}

fn tag_regex() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    // Inline styling (<c>, </c>) and karaoke timestamps (<00:00:01.000>)
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid regex"))
}

/// Parse a WebVTT timestamp (`HH:MM:SS.mmm` or `MM:SS.mmm`) into seconds.
pub fn parse_timestamp(ts: &str) -> Option<f64> {
    let ts = ts.trim().replace(',', ".");
    let parts: Vec<&str> = ts.split(':').collect();
    let (h, m, s) = match parts.as_slice() {
        [h, m, s] => (h.parse::<f64>().ok()?, m.parse::<f64>().ok()?, s.parse::<f64>().ok()?),
        [m, s] => (0.0, m.parse::<f64>().ok()?, s.parse::<f64>().ok()?),
        _ => return None,
    };
    Some(h * 3600.0 + m * 60.0 + s)
}

/// Parse a WebVTT document into cues.
///
/// Header blocks, notes and styles are skipped. Consecutive cues with the
/// same text (common in auto-generated captions) are merged.
pub fn parse_vtt(content: &str) -> Vec<CaptionCue> {
    let mut cues: Vec<CaptionCue> = Vec::new();
    let normalized = content.replace("\r\n", "\n");

    for block in normalized.split("\n\n") {
        let mut lines = block.lines().skip_while(|l| !l.contains("-->"));
        let Some(timing) = lines.next() else {
            continue;
        };

        let mut bounds = timing.split("-->");
        let start = bounds.next().and_then(parse_timestamp);
        // Cue settings may follow the end time
        let end = bounds
            .next()
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(parse_timestamp);
        let (Some(start_seconds), Some(end_seconds)) = (start, end) else {
            continue;
        };

        let text = lines
            .map(|l| tag_regex().replace_all(l, "").trim().to_string())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            continue;
        }

        match cues.last_mut() {
            Some(prev) if prev.text == text => prev.end_seconds = end_seconds,
            _ => cues.push(CaptionCue {
                start_seconds,
                end_seconds,
                text,
            }),
        }
    }

    cues
}

/// Flatten cues into plain caption text.
pub fn captions_text(cues: &[CaptionCue]) -> String {
    cues.iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One `MM:SS - text` line per cue.
pub fn timestamp_lines(cues: &[CaptionCue]) -> Vec<String> {
    cues.iter()
        .map(|c| format!("{} - {}", format_seconds(c.start_seconds), c.text))
        .collect()
}

/// Pick a VTT caption URL from `yt-dlp --dump-json` output.
///
/// Manual subtitles win over automatic captions. Within each, the first
/// language in `languages` that is available wins, then any `<lang>-*`
/// variant, then whatever track comes first.
pub fn select_caption_url(info: &Value, languages: &[String]) -> Option<String> {
    for field in ["subtitles", "automatic_captions"] {
        let Some(tracks) = info[field].as_object() else {
            continue;
        };
        if tracks.is_empty() {
            continue;
        }

        let exact = languages.iter().find_map(|lang| tracks.get(lang.as_str()));
        let prefixed = || {
            languages.iter().find_map(|lang| {
                tracks
                    .iter()
                    .find(|(code, _)| code.starts_with(&format!("{}-", lang)))
                    .map(|(_, formats)| formats)
            })
        };
        let formats = exact
            .or_else(prefixed)
            .or_else(|| tracks.values().next());

        let url = formats
            .and_then(|f| f.as_array())
            .and_then(|list| list.iter().find(|f| f["ext"].as_str() == Some("vtt")))
            .and_then(|f| f["url"].as_str());

        if let Some(url) = url {
            return Some(url.to_string());
        }
    }

    None
}
