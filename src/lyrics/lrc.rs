//! Line-timed (`.lrc`) lyrics.
//!
//! A line counts iff it starts with one `[MM:SS.ff]` tag. Only the first tag
//! is honored; any further tags stay in the text.

use std::sync::LazyLock;

use regex::Regex;

use super::time;
use crate::types::{LyricEvent, Parsed};

/// Regex matching a leading `[MM:SS.ff]` or `[MM:SS.fff]` tag and its text.
#[allow(clippy::expect_used)]
static RE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{2}):(\d{2}\.\d{2,3})\](.*)").expect("valid regex: RE_LINE")
});

/// Parse line-timed content.
///
/// A leading byte-order mark is dropped. Blank lines are ignored; other
/// non-matching lines (headers such as `[ti:...]`) and tagged lines with
/// empty text count as skipped.
pub fn parse(content: &str) -> Parsed {
    let mut parsed = Parsed::default();

    for line in content.trim_start_matches('\u{feff}').lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(event) => parsed.push(event),
            None => parsed.skip(),
        }
    }

    parsed
}

/// Parse one line into a `(time, text)` event.
pub fn parse_line(line: &str) -> Option<LyricEvent> {
    let caps = RE_LINE.captures(line)?;
    let time = time::parse_line_timed(caps.get(1)?.as_str(), caps.get(2)?.as_str())?;
    let text = caps.get(3)?.as_str().trim();
    (!text.is_empty()).then(|| LyricEvent::line(time, text))
}
