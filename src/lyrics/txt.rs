//! Plain-text lyrics with synthetic pacing.

use crate::constants::timing::PLAIN_TEXT_INTERVAL_MS;
use crate::types::{LyricEvent, Parsed};

/// One event per non-blank line, spaced `PLAIN_TEXT_INTERVAL_MS` apart.
pub fn parse(content: &str) -> Parsed {
    let events = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .zip((0..).map(|index: u64| index * PLAIN_TEXT_INTERVAL_MS))
        .map(|(text, time)| LyricEvent::line(time, text))
        .collect();

    Parsed { events, skipped: 0 }
}
