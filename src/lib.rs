//! `lyricline` - timed lyric parsing and furigana alignment.
//!
//! Parses lyric files in several text and subtitle formats into one
//! canonical event sequence, aligns logographic spans with their readings,
//! and provides the catalog, loader and converter tooling around them.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod furigana;
pub mod logging;
pub mod lyrics;
pub mod services;
pub mod types;

pub use error::{Error, Result};
pub use lyrics::{parse_lyrics, LyricFormat};
pub use types::{Furigana, FuriganaEntry, FuriganaMap, LyricEvent, Parsed};
