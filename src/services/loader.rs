//! Loading a song's lyrics from its folder.
//!
//! File access is the only asynchronous step. Failures here never reach the
//! viewer as errors: they are logged and the song shows fewer (or no) lines.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::constants::files::{LYRICS_STEM, SONG_CONFIG_FILE, TRANSLATIONS_DIR};
use crate::error::{Error, Result};
use crate::lyrics::LyricFormat;
use crate::types::{LyricEvent, Parsed};

/// Per-song display configuration (`config.json`).
///
/// Styling keys in the same file belong to the renderer and are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongConfig {
    /// Extension tag of the song's `lyrics.<tag>` file.
    #[serde(default = "default_lyrics_format")]
    pub lyrics_format: String,
}

fn default_lyrics_format() -> String {
    LyricFormat::Lrc.tag().to_string()
}

impl Default for SongConfig {
    fn default() -> Self {
        Self { lyrics_format: default_lyrics_format() }
    }
}

/// Everything the viewer needs for one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongView {
    /// Song id (folder name).
    pub id: String,
    /// Display configuration.
    pub config: SongConfig,
    /// Parsed lyric events with translations attached.
    pub events: Vec<LyricEvent>,
}

impl SongView {
    /// Whether any line carries furigana.
    pub fn has_furigana(&self) -> bool {
        self.events.iter().any(|e| e.furigana.is_some())
    }

    /// Whether any line carries a start time.
    pub fn is_timed(&self) -> bool {
        self.events.iter().any(|e| e.time.is_some())
    }
}

/// Read and parse a lyric file, format chosen by extension.
pub async fn try_load_lyrics(path: &Path) -> Result<Parsed> {
    let format = LyricFormat::from_path(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(e, path.to_path_buf()))?;
    format.parse(&content).map_err(|e| e.with_path(path))
}

/// Like [`try_load_lyrics`], but any failure is logged and yields no events.
pub async fn load_lyrics(path: &Path) -> Vec<LyricEvent> {
    match try_load_lyrics(path).await {
        Ok(parsed) => parsed.into_events(),
        Err(e) => {
            tracing::warn!("Failed to load lyrics {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Song config, or the default when missing or unreadable.
pub async fn load_song_config(song_dir: &Path) -> SongConfig {
    let path = song_dir.join(SONG_CONFIG_FILE);
    let Ok(data) = tokio::fs::read_to_string(&path).await else {
        tracing::debug!("No song config at {}; using defaults", path.display());
        return SongConfig::default();
    };
    serde_json::from_str(&data).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed song config {}: {e}", path.display());
        SongConfig::default()
    })
}

/// Index-aligned translations for `lang`, if the song has them.
pub async fn load_translations(song_dir: &Path, lang: &str) -> Option<Vec<Option<String>>> {
    let path = song_dir.join(TRANSLATIONS_DIR).join(format!("{lang}.json"));
    let data = tokio::fs::read_to_string(&path).await.ok()?;
    serde_json::from_str(&data)
        .map_err(|e| tracing::warn!("Ignoring malformed translations {}: {e}", path.display()))
        .ok()
}

/// Set each event's translation from the entry at the same index.
///
/// Events past the end of `translations` keep what they had.
pub fn attach_translations(events: &mut [LyricEvent], translations: Vec<Option<String>>) {
    for (event, translation) in events.iter_mut().zip(translations) {
        if translation.is_some() {
            event.translation = translation;
        }
    }
}

/// Whether `id` names a single folder directly under the songs root.
fn is_song_id(id: &str) -> bool {
    let mut components = Path::new(id).components();
    !id.contains(['/', '\\'])
        && matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

/// Load a song's config, lyrics and translations.
///
/// An id that is not a plain folder name (separators, `.` or `..`) loads
/// nothing.
pub async fn load_song(songs_dir: &Path, id: &str, lang: &str) -> SongView {
    if !is_song_id(id) {
        tracing::warn!("Rejecting song id {id:?}: not a folder name");
        return SongView { id: id.to_string(), config: SongConfig::default(), events: Vec::new() };
    }

    let song_dir = songs_dir.join(id);
    let config = load_song_config(&song_dir).await;

    let lyrics_path = song_dir.join(format!("{LYRICS_STEM}.{}", config.lyrics_format));
    let mut events = load_lyrics(&lyrics_path).await;

    match load_translations(&song_dir, lang).await {
        Some(translations) => attach_translations(&mut events, translations),
        None => tracing::debug!("No {lang} translation for {id}"),
    }

    SongView { id: id.to_string(), config, events }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn translations_attach_by_index() {
        let mut events = vec![LyricEvent::line(0, "a"), LyricEvent::line(1, "b"), LyricEvent::line(2, "c")];
        attach_translations(&mut events, vec![Some("A".into()), None]);
        assert_eq!(events[0].translation.as_deref(), Some("A"));
        assert_eq!(events[1].translation, None);
        assert_eq!(events[2].translation, None);
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let events = load_lyrics(Path::new("/tmp/nonexistent_lyricline_dir/lyrics.lrc")).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn unsupported_extension_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("lyrics.foo");
        std::fs::write(&path, "[00:01.00]x").unwrap();
        assert!(matches!(try_load_lyrics(&path).await, Err(Error::UnsupportedFormat(_))));
        assert!(load_lyrics(&path).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_structured_file_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("lyrics.json");
        std::fs::write(&path, "{ nope").unwrap();
        match try_load_lyrics(&path).await {
            Err(Error::Parse { file: Some(f), .. }) => assert_eq!(f, path),
            other => panic!("Expected Parse error with path, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn config_defaults_to_line_timed() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load_song_config(tmp.path()).await.lyrics_format, "lrc");
        std::fs::write(tmp.path().join(SONG_CONFIG_FILE), r##"{"lyrics_format": "srt", "colors": {"text": "#fff"}}"##)
            .unwrap();
        assert_eq!(load_song_config(tmp.path()).await.lyrics_format, "srt");
    }

    #[test]
    fn song_ids_are_plain_folder_names() {
        assert!(is_song_id("12"));
        assert!(is_song_id("yoru-ni-kakeru"));
        for id in ["", ".", "..", "../x", "a/b", "a\\b", "/etc"] {
            assert!(!is_song_id(id), "{id:?} accepted");
        }
    }

    #[tokio::test]
    async fn escaping_ids_load_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let songs = tmp.path().join("songs");
        std::fs::create_dir_all(&songs).unwrap();
        std::fs::write(tmp.path().join(format!("{LYRICS_STEM}.lrc")), "[00:01.00]outside").unwrap();

        let view = load_song(&songs, "..", "en").await;
        assert!(view.events.is_empty());
    }
}
