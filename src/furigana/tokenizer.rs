//! Morphological tokenization and offline furigana annotation.
//!
//! The tokenizer supplies, per token, its surface and full katakana reading;
//! [`annotate_line`] aligns each token that contains logographs and places
//! the spans at line offsets. The converter binary drives
//! [`annotate_lrc`] over a whole line-timed file.

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{align, contains_non_kana, katakana_to_hiragana, FuriganaAlignment};
use crate::error::{Error, Result};
use crate::lyrics::lrc;

/// A token from morphological analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Text as it appears in the input.
    pub surface: String,
    /// Full reading in katakana or hiragana, if the dictionary knows one.
    pub reading: Option<String>,
}

/// Splits text into tokens with readings.
pub trait Tokenizer {
    /// Tokenize one line.
    fn tokenize(&self, text: &str) -> Result<Vec<Token>>;
}

/// Furigana for one line of text.
///
/// Tokens made only of kana are passed over. Each remaining token is
/// aligned against its hiragana-folded reading (or its own surface when the
/// dictionary has none) and its spans are shifted to the token's position.
pub fn annotate_line<T: Tokenizer + ?Sized>(tokenizer: &T, text: &str) -> Result<FuriganaAlignment> {
    let mut line = FuriganaAlignment::default();
    let mut byte_cursor = 0;
    let mut unit_cursor = 0;

    for token in tokenizer.tokenize(text)? {
        // Tokenizers may drop whitespace, so locate the surface from the cursor
        let Some(found) = text[byte_cursor..].find(&token.surface) else {
            tracing::warn!("Token {:?} not found in {text:?}; remaining tokens ignored", token.surface);
            break;
        };
        let start_byte = byte_cursor + found;
        let start_unit = unit_cursor + text[byte_cursor..start_byte].encode_utf16().count();

        if contains_non_kana(&token.surface) {
            let reading = katakana_to_hiragana(token.reading.as_deref().unwrap_or(&token.surface));
            line.extend(align(&token.surface, &reading).shifted(start_unit));
        }

        byte_cursor = start_byte + token.surface.len();
        unit_cursor = start_unit + token.surface.encode_utf16().count();
    }

    Ok(line)
}

/// One converted line of the structured document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedLine {
    /// Start time in milliseconds.
    pub time: u64,
    /// Line text.
    pub text: String,
    /// Spans as parallel arrays.
    pub furigana: FuriganaAlignment,
}

/// Structured document written by the converter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    /// Lines in source order.
    pub lyrics: Vec<AnnotatedLine>,
}

impl AnnotatedDocument {
    /// Pretty JSON with four-space indentation.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| Error::Msg(e.to_string()))
    }
}

/// Parse line-timed content and annotate every line, in order.
pub fn annotate_lrc<T: Tokenizer + ?Sized>(tokenizer: &T, content: &str) -> Result<AnnotatedDocument> {
    let parsed = lrc::parse(content);
    if parsed.skipped > 0 {
        tracing::debug!("Skipped {} non-lyric lines", parsed.skipped);
    }

    let mut lyrics = Vec::with_capacity(parsed.events.len());
    let mut unresolved = 0;
    for event in parsed.events {
        let furigana = annotate_line(tokenizer, &event.text)?;
        if !furigana.is_resolved() {
            unresolved += 1;
        }
        lyrics.push(AnnotatedLine { time: event.time.unwrap_or_default(), text: event.text, furigana });
    }

    tracing::info!("Annotated {} lines ({unresolved} with unresolved readings)", lyrics.len());
    Ok(AnnotatedDocument { lyrics })
}

/// Reading column of an IPADIC-style feature string (`*` means none).
fn reading_from_feature(feature: &str) -> Option<String> {
    feature
        .split(',')
        .nth(7)
        .filter(|reading| !reading.is_empty() && *reading != "*")
        .map(str::to_string)
}

/// [`Tokenizer`] backed by a vibrato system dictionary.
pub struct VibratoTokenizer {
    inner: vibrato::Tokenizer,
}

impl VibratoTokenizer {
    /// Load an uncompressed vibrato dictionary from `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs_err::File::open(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        let dict = vibrato::Dictionary::read(BufReader::new(file))
            .map_err(|e| Error::Tokenizer(format!("failed to load {}: {e}", path.display())))?;
        Ok(Self { inner: vibrato::Tokenizer::new(dict) })
    }
}

impl Tokenizer for VibratoTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut worker = self.inner.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();
        Ok(worker
            .token_iter()
            .map(|t| Token { surface: t.surface().to_string(), reading: reading_from_feature(t.feature()) })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use std::collections::HashMap;

    use super::*;

    /// Splits on a fixed word list, longest first, reading from a table.
    struct TableTokenizer {
        words: Vec<(&'static str, &'static str)>,
    }

    impl Tokenizer for TableTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
            let readings: HashMap<_, _> = self.words.iter().copied().collect();
            let mut words: Vec<_> = self.words.iter().map(|(w, _)| *w).collect();
            words.sort_by_key(|w| std::cmp::Reverse(w.len()));

            let mut tokens = Vec::new();
            let mut rest = text;
            while let Some(c) = rest.chars().next() {
                let surface = words.iter().find(|w| rest.starts_with(**w)).copied().unwrap_or(&rest[..c.len_utf8()]);
                tokens.push(Token {
                    surface: surface.to_string(),
                    reading: readings.get(surface).map(|r| (*r).to_string()),
                });
                rest = &rest[surface.len()..];
            }
            Ok(tokens)
        }
    }

    fn tokenizer() -> TableTokenizer {
        TableTokenizer { words: vec![("夜空", "ヨゾラ"), ("に", "ニ"), ("星", "ホシ"), ("輝く", "カガヤク")] }
    }

    #[test]
    fn spans_are_placed_at_line_offsets() {
        let alignment = annotate_line(&tokenizer(), "夜空に星が輝く").unwrap();
        let triple = alignment.to_triple();
        assert_eq!(triple.positions, vec![0, 3, 5]);
        assert_eq!(triple.kanji, vec!["夜空", "星", "輝"]);
        assert_eq!(triple.readings, vec!["よぞら", "ほし", "かがや"]);
    }

    #[test]
    fn astral_prefix_shifts_offsets_by_two_units() {
        let triple = annotate_line(&tokenizer(), "🎵夜空に星").unwrap().to_triple();
        assert_eq!(triple.positions, vec![2, 5]);
        assert_eq!(triple.kanji, vec!["夜空", "星"]);
    }

    #[test]
    fn unknown_tokens_fall_back_to_surface() {
        // no reading for 雨, so the surface stands in for it
        let alignment = annotate_line(&tokenizer(), "雨").unwrap();
        assert_eq!(alignment.len(), 1);
        assert_eq!(alignment.spans[0].kanji, "雨");
    }

    #[test]
    fn feature_reading_column() {
        assert_eq!(
            reading_from_feature("名詞,固有名詞,地名,一般,*,*,京都,キョウト,キョート"),
            Some("キョウト".into())
        );
        assert_eq!(reading_from_feature("記号,空白,*,*,*,*,*,*"), None);
        assert_eq!(reading_from_feature("名詞"), None);
    }

    #[test]
    fn converts_line_timed_file() {
        let doc = annotate_lrc(&tokenizer(), "[ti:x]\n[00:01.00]夜空に星\n[00:03.50]らら\n").unwrap();
        assert_eq!(doc.lyrics.len(), 2);
        assert_eq!(doc.lyrics[0].time, 1000);
        assert_eq!(doc.lyrics[0].furigana.len(), 2);
        assert!(doc.lyrics[1].furigana.is_empty());

        let json = doc.to_json_pretty().unwrap();
        assert!(json.starts_with("{\n    \"lyrics\": ["));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["lyrics"][0]["furigana"]["readings"][0], "よぞら");
    }
}
