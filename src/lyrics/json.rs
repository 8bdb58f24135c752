//! Structured (`.json`) lyrics with pre-computed furigana.
//!
//! The document is decoded as a whole: a syntax error, a schema error or a
//! furigana triple whose arrays differ in length fails the file and no
//! partial events are returned.

use serde::{Deserialize, Deserializer};

use crate::constants::event::DEFAULT_KIND;
use crate::error::{Error, Result};
use crate::furigana::FuriganaAlignment;
use crate::types::{Furigana, LyricEvent, Parsed};

#[derive(Debug, Deserialize)]
struct Document {
    lyrics: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    #[serde(default, deserialize_with = "millis")]
    time: Option<u64>,
    #[serde(default, deserialize_with = "millis")]
    end_time: Option<u64>,
    text: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    translation: Option<String>,
    furigana: Option<FuriganaAlignment>,
}

/// Millisecond field that may be written as an integer or a float.
fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u64>, D::Error> {
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!("invalid millisecond value {value}")));
    }
    Ok(Some(value.round() as u64))
}

/// Decode a structured document.
///
/// Text is kept verbatim so furigana offsets stay valid; entries whose text
/// is blank or whose end precedes their start are skipped.
pub fn parse(content: &str) -> Result<Parsed> {
    let document: Document =
        serde_json::from_str(content).map_err(|e| Error::parse(format!("structured lyrics: {e}"), None))?;

    let mut parsed = Parsed::default();
    for entry in document.lyrics {
        if entry.text.trim().is_empty() {
            parsed.skip();
            continue;
        }
        if let (Some(start), Some(end)) = (entry.time, entry.end_time) {
            if end < start {
                tracing::debug!("Entry {:?} ends before it starts; skipped", entry.text);
                parsed.skip();
                continue;
            }
        }

        parsed.push(LyricEvent {
            time: entry.time,
            end_time: entry.end_time,
            text: entry.text,
            kind: entry.kind.unwrap_or_else(|| DEFAULT_KIND.to_string()),
            translation: entry.translation,
            furigana: entry.furigana.map(|alignment| Furigana::Map(alignment.to_map())),
        });
    }

    Ok(parsed)
}
