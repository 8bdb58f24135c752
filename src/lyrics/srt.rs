//! Subtitle block (`.srt`) lyrics.

use std::sync::LazyLock;

use regex::Regex;

use super::time;
use crate::types::{LyricEvent, Parsed};

/// Regex matching blank-line block separators.
#[allow(clippy::expect_used)]
static RE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*\n").expect("valid regex: RE_SEPARATOR")
});

/// Regex matching `HH:MM:SS,mmm --> HH:MM:SS,mmm`.
#[allow(clippy::expect_used)]
static RE_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})")
        .expect("valid regex: RE_TIMING")
});

/// Parse block content. Blocks with fewer than three lines, a bad timing
/// line, or no text count as skipped.
pub fn parse(content: &str) -> Parsed {
    let normalized = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let mut parsed = Parsed::default();

    for block in RE_SEPARATOR.split(&normalized) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        match parse_block(block) {
            Some(event) => parsed.push(event),
            None => parsed.skip(),
        }
    }

    parsed
}

/// Parse one `index / timing / text...` block.
pub fn parse_block(block: &str) -> Option<LyricEvent> {
    let lines: Vec<&str> = block.lines().collect();
    if lines.len() < 3 {
        return None;
    }

    let caps = RE_TIMING.captures(lines[1])?;
    let start = time::parse_block(&caps[1], &caps[2], &caps[3], &caps[4])?;
    let end = time::parse_block(&caps[5], &caps[6], &caps[7], &caps[8])?;

    let text = lines[2..].join(" ");
    let text = text.trim();
    (!text.is_empty()).then(|| LyricEvent::line(start, text).ending_at(end))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn joins_multi_line_text() {
        let parsed = parse("1\n00:00:01,000 --> 00:00:02,500\nHello\nWorld");
        assert_eq!(parsed.events, vec![LyricEvent::line(1000, "Hello World").ending_at(2500)]);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn skips_malformed_blocks_and_keeps_order() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\nfirst\n\n\
            2\nnot a timing line\nlost\n\n\
            3\n00:00:05,000 --> 00:00:06,000\n\n\n\
            4\n01:00:00,250 --> 01:00:01,000\nlast\n";
        let parsed = parse(content);
        let texts: Vec<_> = parsed.events.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "last"]);
        assert_eq!(parsed.events[1].time, Some(3_600_250));
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn tolerates_crlf_and_bom() {
        let parsed = parse("\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nHi\r\n\r\n");
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.events[0].text, "Hi");
    }
}
