//! Loading a whole song folder: config, lyrics and translations.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::fs;
use std::path::Path;

use lyricline::catalog::Catalog;
use lyricline::furigana::ruby::{segments, to_bracket_notation};
use lyricline::services::loader::load_song;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[tokio::test]
async fn structured_song_with_translations() {
    let tmp = tempfile::tempdir().unwrap();
    let song = tmp.path().join("hoshi");
    write(&song.join("metadata.json"), r#"{"name": "Hoshi", "artist": "Someone", "language": "jp"}"#);
    write(&song.join("config.json"), r#"{"lyrics_format": "json"}"#);
    write(
        &song.join("lyrics.json"),
        r#"{"lyrics": [
            {"time": 1000, "text": "夜空に星", "furigana": {"positions": [0, 3], "kanji": ["夜空", "星"], "readings": ["よぞら", "ほし"]}},
            {"time": 3000, "text": "ららら"}
        ]}"#,
    );
    write(&song.join("translations").join("zh-CN.json"), r#"["夜空中的星星", null]"#);

    let view = load_song(tmp.path(), "hoshi", "zh-CN").await;
    assert_eq!(view.events.len(), 2);
    assert!(view.has_furigana());
    assert!(view.is_timed());
    assert_eq!(view.events[0].translation.as_deref(), Some("夜空中的星星"));
    assert_eq!(view.events[1].translation, None);

    let first = &view.events[0];
    assert_eq!(to_bracket_notation(&segments(&first.text, first.furigana_map())), "夜空(よぞら)に星(ほし)");

    let catalog = Catalog::scan(tmp.path()).unwrap();
    assert_eq!(catalog.get("hoshi").unwrap().language.as_deref(), Some("jp"));
}

#[tokio::test]
async fn song_without_config_reads_line_timed_lyrics() {
    let tmp = tempfile::tempdir().unwrap();
    write(&tmp.path().join("plain").join("lyrics.lrc"), "[ti:Plain]\n[00:01.00]one\n[00:02.00]two\n");

    let view = load_song(tmp.path(), "plain", "zh-CN").await;
    assert_eq!(view.config.lyrics_format, "lrc");
    assert_eq!(view.events.len(), 2);
    assert!(!view.has_furigana());
}

#[tokio::test]
async fn broken_structured_lyrics_degrade_to_empty_view() {
    let tmp = tempfile::tempdir().unwrap();
    let song = tmp.path().join("broken");
    write(&song.join("config.json"), r#"{"lyrics_format": "json"}"#);
    write(&song.join("lyrics.json"), r#"{"lyrics": [{"time": 0, "text": "a", "furigana": {"positions": [0]}}]}"#);

    let view = load_song(tmp.path(), "broken", "zh-CN").await;
    assert!(view.events.is_empty());
}

#[tokio::test]
async fn unsupported_configured_format_degrades_to_empty_view() {
    let tmp = tempfile::tempdir().unwrap();
    let song = tmp.path().join("odd");
    write(&song.join("config.json"), r#"{"lyrics_format": "foo"}"#);
    write(&song.join("lyrics.foo"), "[00:01.00]x");

    let view = load_song(tmp.path(), "odd", "zh-CN").await;
    assert!(view.events.is_empty());
}
