//! Split a line into plain and reading-annotated segments for display.

use std::fmt::Write;

use crate::types::FuriganaMap;

/// A run of display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubySegment {
    /// Text shown as-is.
    Plain(String),
    /// Base text with its reading above it.
    Annotated {
        /// Logographic base text.
        base: String,
        /// Reading shown over the base.
        reading: String,
    },
}

/// Segment `text` using `furigana`.
///
/// An entry is used only if its kanji really occurs at its offset; stale
/// or mismatched entries and unresolved (empty) readings fall back to
/// plain text.
pub fn segments(text: &str, furigana: Option<&FuriganaMap>) -> Vec<RubySegment> {
    let Some(map) = furigana.filter(|m| !m.is_empty()) else {
        return if text.is_empty() { Vec::new() } else { vec![RubySegment::Plain(text.to_string())] };
    };

    let mut out = Vec::new();
    let mut plain = String::new();
    let mut rest = text;
    let mut unit = 0;

    while let Some(c) = rest.chars().next() {
        let matched = map
            .get(&unit)
            .filter(|entry| !entry.reading.is_empty() && !entry.kanji.is_empty() && rest.starts_with(&entry.kanji));

        if let Some(entry) = matched {
            if !plain.is_empty() {
                out.push(RubySegment::Plain(std::mem::take(&mut plain)));
            }
            out.push(RubySegment::Annotated { base: entry.kanji.clone(), reading: entry.reading.clone() });
            rest = &rest[entry.kanji.len()..];
            unit += entry.kanji.encode_utf16().count();
        } else {
            plain.push(c);
            rest = &rest[c.len_utf8()..];
            unit += c.len_utf16();
        }
    }

    if !plain.is_empty() {
        out.push(RubySegment::Plain(plain));
    }
    out
}

/// Render segments as `base(reading)` text.
pub fn to_bracket_notation(segments: &[RubySegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            RubySegment::Plain(text) => out.push_str(text),
            RubySegment::Annotated { base, reading } => {
                let _ = write!(out, "{base}({reading})");
            }
        }
    }
    out
}
