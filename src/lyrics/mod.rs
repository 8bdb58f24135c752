//! Lyric file formats.
//!
//! Each format module turns raw file content into [`Parsed`] events.
//! [`LyricFormat`] names the closed set of formats and dispatches to them;
//! it is the only entry point callers outside this module need.

pub mod ass;
pub mod json;
pub mod lrc;
pub mod srt;
pub mod time;
pub mod txt;
pub mod xml;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::Parsed;

/// Supported lyric formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LyricFormat {
    /// `[MM:SS.ff]text` line-timed lyrics.
    Lrc,
    /// Untimed plain text.
    Txt,
    /// Subtitle dialogue lines.
    Ass,
    /// Numbered subtitle blocks.
    Srt,
    /// Structured document with furigana triples.
    Json,
    /// `<lyric>` elements with attributes.
    Xml,
}

impl LyricFormat {
    /// Returns all formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Lrc, Self::Txt, Self::Ass, Self::Srt, Self::Json, Self::Xml]
    }

    /// File extension tag of this format.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Lrc => "lrc",
            Self::Txt => "txt",
            Self::Ass => "ass",
            Self::Srt => "srt",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Look up a format by tag, ignoring case.
    pub fn from_tag(tag: &str) -> Result<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|format| format.tag() == tag)
            .ok_or(Error::UnsupportedFormat(tag))
    }

    /// Format named by a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        Self::from_tag(ext)
    }

    /// Parse `content` in this format.
    ///
    /// Only the structured format can fail as a whole; every other format
    /// drops bad units and reports them in [`Parsed::skipped`].
    pub fn parse(self, content: &str) -> Result<Parsed> {
        let parsed = match self {
            Self::Lrc => lrc::parse(content),
            Self::Txt => txt::parse(content),
            Self::Ass => ass::parse(content),
            Self::Srt => srt::parse(content),
            Self::Json => json::parse(content)?,
            Self::Xml => xml::parse(content),
        };

        if parsed.skipped > 0 {
            tracing::debug!("{self}: {} events, {} units skipped", parsed.events.len(), parsed.skipped);
        }
        Ok(parsed)
    }
}

impl fmt::Display for LyricFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LyricFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}

/// Parse `content` in the format named by `tag`.
pub fn parse_lyrics(tag: &str, content: &str) -> Result<Parsed> {
    LyricFormat::from_tag(tag)?.parse(content)
}
