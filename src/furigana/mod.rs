//! Furigana: logographic spans of a line and their phonetic readings.
//!
//! The ordered list of [`AlignmentSpan`]s is the primary representation.
//! On disk an alignment is stored as three parallel arrays
//! (`positions`, `kanji`, `readings`); the offset-keyed [`FuriganaMap`]
//! the viewer consumes is derived from the spans.
//!
//! All offsets count UTF-16 code units of the line text, the indexing the
//! structured documents are written with.

pub mod align;
pub mod ruby;
pub mod tokenizer;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{FuriganaEntry, FuriganaMap};

pub use align::align;

/// Whether `c` is a Han ideograph (CJK Unified Ideographs or Extension A).
pub const fn is_logographic(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9faf}' | '\u{3400}'..='\u{4dbf}')
}

/// Whether `c` is hiragana or katakana.
pub const fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{30ff}')
}

/// Whether `text` has anything besides kana.
pub fn contains_non_kana(text: &str) -> bool {
    text.chars().any(|c| !is_kana(c))
}

/// Fold katakana (ァ..ヶ) to the matching hiragana.
pub fn katakana_to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{30a1}'..='\u{30f6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// One logographic span and its reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentSpan {
    /// UTF-16 code unit offset of the span in the line.
    pub offset: usize,
    /// The logographic text.
    pub kanji: String,
    /// Reading; empty means alignment was unresolved.
    pub reading: String,
}

/// Ordered spans of one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FuriganaTriple", into = "FuriganaTriple")]
pub struct FuriganaAlignment {
    /// Spans in left-to-right order.
    pub spans: Vec<AlignmentSpan>,
}

/// Wire shape: three positionally correlated arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuriganaTriple {
    /// Span offsets.
    pub positions: Vec<usize>,
    /// Span texts.
    pub kanji: Vec<String>,
    /// Span readings.
    pub readings: Vec<String>,
}

impl FuriganaAlignment {
    /// Build from parallel arrays; the three must have equal length.
    pub fn from_triple(positions: Vec<usize>, kanji: Vec<String>, readings: Vec<String>) -> Result<Self> {
        if positions.len() != kanji.len() || kanji.len() != readings.len() {
            return Err(Error::parse(
                format!(
                    "furigana arrays differ in length: {} positions, {} kanji, {} readings",
                    positions.len(),
                    kanji.len(),
                    readings.len()
                ),
                None,
            ));
        }

        let spans = positions
            .into_iter()
            .zip(kanji)
            .zip(readings)
            .map(|((offset, kanji), reading)| AlignmentSpan { offset, kanji, reading })
            .collect();
        Ok(Self { spans })
    }

    /// Split back into parallel arrays.
    pub fn to_triple(&self) -> FuriganaTriple {
        self.clone().into()
    }

    /// Offset-keyed view for rendering.
    pub fn to_map(&self) -> FuriganaMap {
        self.spans
            .iter()
            .map(|span| {
                (span.offset, FuriganaEntry { kanji: span.kanji.clone(), reading: span.reading.clone() })
            })
            .collect()
    }

    /// Move every offset right by `delta` code units.
    #[must_use]
    pub fn shifted(mut self, delta: usize) -> Self {
        for span in &mut self.spans {
            span.offset += delta;
        }
        self
    }

    /// Append another alignment's spans.
    pub fn extend(&mut self, other: Self) {
        self.spans.extend(other.spans);
    }

    /// Whether every span has a reading.
    pub fn is_resolved(&self) -> bool {
        self.spans.iter().all(|span| !span.reading.is_empty())
    }

    /// Whether there are no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of spans.
    pub fn len(&self) -> usize {
        self.spans.len()
    }
}

impl TryFrom<FuriganaTriple> for FuriganaAlignment {
    type Error = Error;

    fn try_from(triple: FuriganaTriple) -> Result<Self> {
        Self::from_triple(triple.positions, triple.kanji, triple.readings)
    }
}

impl From<FuriganaAlignment> for FuriganaTriple {
    fn from(alignment: FuriganaAlignment) -> Self {
        let mut triple = Self::default();
        for span in alignment.spans {
            triple.positions.push(span.offset);
            triple.kanji.push(span.kanji);
            triple.readings.push(span.reading);
        }
        triple
    }
}
