//! `lyricline` - search the song catalog and print synchronized lyrics.
//!
//! Usage:
//!   `lyricline search <query>`
//!   `lyricline show <song-id>`
//!   `lyricline parse <lyric-file>`

use std::path::Path;

use anyhow::{bail, Context};
use lyricline::catalog::Catalog;
use lyricline::config::Config;
use lyricline::constants::search::MAX_SEARCH_RESULTS;
use lyricline::furigana::ruby::{segments, to_bracket_notation};
use lyricline::logging::init_logging;
use lyricline::services::loader::{load_song, try_load_lyrics};
use lyricline::types::LyricEvent;

const USAGE: &str = "Usage: lyricline <search <query> | show <song-id> | parse <lyric-file>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((cmd, rest)) if cmd == "search" && !rest.is_empty() => search(&config, &rest.join(" ")),
        Some((cmd, [id])) if cmd == "show" => {
            show(&config, id).await;
            Ok(())
        }
        Some((cmd, [file])) if cmd == "parse" => parse(Path::new(file)).await,
        _ => bail!(USAGE),
    }
}

/// Catalog index checked against the song folders, or a fresh scan when no
/// index exists yet.
fn catalog(config: &Config) -> anyhow::Result<Catalog> {
    if config.catalog_path.is_file() {
        let mut catalog = Catalog::load(&config.catalog_path)?;
        if let Err(e) = catalog.reconcile(&config.songs_dir) {
            tracing::warn!("Using saved catalog as-is: {e}");
        }
        return Ok(catalog);
    }
    tracing::info!("No catalog at {}; scanning songs", config.catalog_path.display());
    Catalog::scan(&config.songs_dir).context("building catalog")
}

fn search(config: &Config, query: &str) -> anyhow::Result<()> {
    let catalog = catalog(config)?;
    let hits = catalog.search(query, config.search_min_score, MAX_SEARCH_RESULTS);
    if hits.is_empty() {
        println!("No songs match \"{query}\"");
    }
    for hit in hits {
        println!("{:>4}  {:<24} {} - {}", hit.score, hit.song.id, hit.song.name, hit.song.artist);
    }
    Ok(())
}

async fn show(config: &Config, id: &str) {
    let view = load_song(&config.songs_dir, id, &config.translation_lang).await;
    if view.events.is_empty() {
        println!("No lyrics for {id}");
        return;
    }
    for event in &view.events {
        print_event(event);
    }
}

async fn parse(path: &Path) -> anyhow::Result<()> {
    let parsed = try_load_lyrics(path).await?;
    println!("{}", serde_json::to_string_pretty(&parsed.events)?);
    eprintln!("{} events, {} skipped", parsed.events.len(), parsed.skipped);
    Ok(())
}

fn print_event(event: &LyricEvent) {
    let line = to_bracket_notation(&segments(&event.text, event.furigana_map()));
    match event.time {
        Some(ms) => println!("[{}] {line}", format_timestamp(ms)),
        None => println!("[--:--.--] {line}"),
    }
    if let Some(translation) = &event.translation {
        println!("           {translation}");
    }
}

/// `mm:ss.cc`, the inverse of the line tag notation.
fn format_timestamp(ms: u64) -> String {
    format!("{:02}:{:02}.{:02}", ms / 60_000, (ms / 1000) % 60, (ms % 1000) / 10)
}
