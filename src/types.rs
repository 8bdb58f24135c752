//! Core lyric types shared by every format parser.
//!
//! `LyricEvent` is the canonical record all formats converge on. Field names
//! serialize to the wire shape the viewer consumes (`endTime`, `type`).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::constants::event::DEFAULT_KIND;

/// Reading annotation for one logographic span, keyed by its start offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuriganaEntry {
    /// The logographic span as it appears in the text.
    pub kanji: String,
    /// Phonetic reading; empty when alignment was unresolved.
    pub reading: String,
}

/// UTF-16 code unit offset within `text` → annotation starting there.
pub type FuriganaMap = BTreeMap<usize, FuriganaEntry>;

/// Furigana attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Furigana {
    /// Decoded offset-keyed annotations.
    Map(FuriganaMap),
    /// Opaque attribute value carried through undecoded.
    Raw(String),
}

impl Furigana {
    /// The decoded map, if this is not an opaque attribute.
    pub const fn as_map(&self) -> Option<&FuriganaMap> {
        match self {
            Self::Map(map) => Some(map),
            Self::Raw(_) => None,
        }
    }
}

// Untagged derive would buffer the map and lose integer-key support, so
// decide on the JSON shape first.
impl<'de> Deserialize<'de> for Furigana {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(raw) => Ok(Self::Raw(raw)),
            other => serde_json::from_value(other).map(Self::Map).map_err(D::Error::custom),
        }
    }
}

/// One timed lyric line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricEvent {
    /// Start time in milliseconds from the start of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    /// End time in milliseconds, for formats with explicit duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    /// Display text.
    pub text: String,
    /// Event kind tag.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// Parallel translation, filled in by enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Reading annotations for logographic spans in `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furigana: Option<Furigana>,
}

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

impl LyricEvent {
    /// A plain `line` event starting at `time`.
    pub fn line(time: u64, text: impl Into<String>) -> Self {
        Self {
            time: Some(time),
            end_time: None,
            text: text.into(),
            kind: default_kind(),
            translation: None,
            furigana: None,
        }
    }

    /// Set the end time.
    #[must_use]
    pub const fn ending_at(mut self, end_time: u64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Decoded furigana map, if any.
    pub fn furigana_map(&self) -> Option<&FuriganaMap> {
        self.furigana.as_ref().and_then(Furigana::as_map)
    }
}

/// Output of a single parse: events in source order plus the number of
/// units (lines, blocks, elements, entries) that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    /// Events in order of appearance.
    pub events: Vec<LyricEvent>,
    /// Units that failed their shape check or had no text.
    pub skipped: usize,
}

impl Parsed {
    /// Record an event.
    pub fn push(&mut self, event: LyricEvent) {
        self.events.push(event);
    }

    /// Record a dropped unit.
    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    /// Consume into the event list.
    pub fn into_events(self) -> Vec<LyricEvent> {
        self.events
    }
}
