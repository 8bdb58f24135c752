//! Subtitle dialogue (`.ass`) lyrics.
//!
//! Reads `Dialogue:` lines of the shape
//! `Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text`.
//! The text field is everything after the ninth comma and may itself
//! contain commas. Other section lines are ignored.

use std::sync::LazyLock;

use regex::Regex;

use super::time;
use crate::types::{LyricEvent, Parsed};

/// Regex matching a dialogue line; captures start, end and text.
#[allow(clippy::expect_used)]
static RE_DIALOGUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Dialogue:\s*\d+,(\d+:\d{2}:\d{2}\.\d{2}),(\d+:\d{2}:\d{2}\.\d{2}),(?:[^,]*,){6}(.*)$",
    )
    .expect("valid regex: RE_DIALOGUE")
});

/// Regex matching `{...}` override blocks.
#[allow(clippy::expect_used)]
static RE_OVERRIDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^}]*\}").expect("valid regex: RE_OVERRIDE")
});

/// Parse dialogue content, ignoring a leading byte-order mark.
pub fn parse(content: &str) -> Parsed {
    let mut parsed = Parsed::default();

    for line in content.trim_start_matches('\u{feff}').lines() {
        if !line.starts_with("Dialogue:") {
            continue;
        }
        match parse_dialogue(line) {
            Some(event) => parsed.push(event),
            None => parsed.skip(),
        }
    }

    parsed
}

/// Parse a single `Dialogue:` line.
pub fn parse_dialogue(line: &str) -> Option<LyricEvent> {
    let caps = RE_DIALOGUE.captures(line)?;
    let start = time::parse_dialogue(caps.get(1)?.as_str())?;
    let end = time::parse_dialogue(caps.get(2)?.as_str())?;
    let text = strip_overrides(caps.get(3)?.as_str());
    let text = text.trim();
    (!text.is_empty()).then(|| LyricEvent::line(start, text).ending_at(end))
}

/// Remove inline `{\...}` override codes.
pub fn strip_overrides(text: &str) -> String {
    RE_OVERRIDE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn strips_inline_markup() {
        let event = parse_dialogue(r"Dialogue: 0,0:00:01.00,0:00:02.00,,,,,,,{\i1}Hi{\i0}").unwrap();
        assert_eq!(event.text, "Hi");
        assert_eq!(event.time, Some(1000));
        assert_eq!(event.end_time, Some(2000));
    }

    #[test]
    fn text_may_contain_commas() {
        let line = "Dialogue: 0,0:01:02.50,0:01:04.00,Default,,0,0,0,,Well, hello, there";
        let event = parse_dialogue(line).unwrap();
        assert_eq!(event.text, "Well, hello, there");
        assert_eq!(event.time, Some(62_500));
        assert_eq!(event.end_time, Some(64_000));
    }

    #[test]
    fn ignores_non_dialogue_and_counts_malformed() {
        let content = "[Script Info]\nTitle: x\n\
            [Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
            Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,one\n\
            Dialogue: 0,bad,0:00:02.00,Default,,0,0,0,,broken\n\
            Dialogue: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,{\\b1}{\\b0}\n\
            Comment: 0,0:00:05.00,0:00:06.00,Default,,0,0,0,,note\n";
        let parsed = parse(content);
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.events[0].text, "one");
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn bom_prefixed_first_dialogue_is_read() {
        let parsed = parse("\u{feff}Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,first");
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.events[0].text, "first");
    }

    #[test]
    fn overflowing_hours_are_skipped() {
        let parsed = parse(
            "Dialogue: 0,99999999999999999:00:00.00,0:00:02.00,Default,,0,0,0,,huge\n\
             Dialogue: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,fine",
        );
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.events[0].text, "fine");
        assert_eq!(parsed.skipped, 1);
    }
}
