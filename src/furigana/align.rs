//! Best-effort alignment of logographic runs against a full reading.
//!
//! Non-logographic runs of the surface are assumed to read the same in the
//! reading and become literal anchors of an `^...$` pattern; each
//! logographic run becomes a lazy `(.+?)` group. Whatever the groups
//! capture is taken as that run's reading.
//!
//! This cannot be exact: a character's reading depends on context and no
//! pronunciation dictionary is consulted. When the reading does not fit the
//! pattern every span gets an empty reading, which callers must treat as
//! "unresolved" rather than "needs no reading".

use regex::Regex;

use super::{is_logographic, AlignmentSpan, FuriganaAlignment};

/// A maximal run of one script class.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Run {
    Anchor(String),
    Logographic { offset: usize, text: String },
}

/// Split `surface` into alternating anchor and logographic runs.
fn runs(surface: &str) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut offset = 0;

    for c in surface.chars() {
        match (runs.last_mut(), is_logographic(c)) {
            (Some(Run::Logographic { text, .. }), true) | (Some(Run::Anchor(text)), false) => text.push(c),
            (_, true) => runs.push(Run::Logographic { offset, text: c.to_string() }),
            (_, false) => runs.push(Run::Anchor(c.to_string())),
        }
        offset += c.len_utf16();
    }

    runs
}

/// Anchored pattern with one capture group per logographic run.
fn pattern(runs: &[Run]) -> String {
    let mut pattern = String::from("^");
    for run in runs {
        match run {
            Run::Anchor(text) => pattern.push_str(&regex::escape(text)),
            Run::Logographic { .. } => pattern.push_str("(.+?)"),
        }
    }
    pattern.push('$');
    pattern
}

/// Align the logographic runs of `surface` with substrings of `reading`.
///
/// Spans come back in left-to-right order with UTF-16 code unit offsets
/// into `surface`. Captured readings are trimmed.
pub fn align(surface: &str, reading: &str) -> FuriganaAlignment {
    let runs = runs(surface);

    let captured: Option<Vec<String>> = Regex::new(&pattern(&runs))
        .map_err(|e| tracing::warn!("Alignment pattern for {surface:?} rejected: {e}"))
        .ok()
        .and_then(|re| {
            re.captures(reading).map(|caps| {
                caps.iter()
                    .skip(1)
                    .map(|m| m.map_or_else(String::new, |m| m.as_str().trim().to_string()))
                    .collect()
            })
        });

    if captured.is_none() {
        tracing::debug!("Reading {reading:?} does not fit {surface:?}; spans left unresolved");
    }
    let mut readings = captured.unwrap_or_default().into_iter();

    let spans = runs
        .into_iter()
        .filter_map(|run| match run {
            Run::Logographic { offset, text } => Some(AlignmentSpan {
                offset,
                kanji: text,
                reading: readings.next().unwrap_or_default(),
            }),
            Run::Anchor(_) => None,
        })
        .collect();

    FuriganaAlignment { spans }
}
