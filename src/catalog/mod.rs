//! Song catalog: per-song metadata, the combined index and fuzzy search.
//!
//! Each song lives in its own folder under the songs root with a
//! `metadata.json`. The folder name is the song id. The combined index is a
//! JSON array of every song's metadata.

use std::path::{Path, PathBuf};
use std::time::Instant;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::constants::files::METADATA_FILE;
use crate::error::{Error, Result};

/// Metadata describing one song.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongMetadata {
    /// Folder name of the song.
    #[serde(default)]
    pub id: String,
    /// Song title.
    pub name: String,
    /// Performing artist.
    #[serde(default)]
    pub artist: String,
    /// Album title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Release date as written in the metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Duration as written in the metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<serde_json::Value>,
    /// Lyric language code, e.g. `jp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Phonetic reading of the title.
    #[serde(default, rename = "nameReading", skip_serializing_if = "Option::is_none")]
    pub name_reading: Option<String>,
    /// Phonetic reading of the artist.
    #[serde(default, rename = "artistReading", skip_serializing_if = "Option::is_none")]
    pub artist_reading: Option<String>,
    /// Genre.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Lyricist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyricist: Option<String>,
    /// Composer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SongMetadata {
    /// Every field search looks at.
    fn searchable(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.name.as_str()),
            Some(self.artist.as_str()),
            self.name_reading.as_deref(),
            self.artist_reading.as_deref(),
            self.album.as_deref(),
            self.genre.as_deref(),
            self.lyricist.as_deref(),
            self.composer.as_deref(),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .chain(self.tags.iter().map(String::as_str))
        .filter(|field| !field.is_empty())
    }
}

impl SongMetadata {
    /// Copy the fields an index may hold stale from `fresh`.
    fn refresh_from(&mut self, fresh: &Self) -> usize {
        let id = self.id.as_str();
        [
            refresh(id, "name", &mut self.name, &fresh.name),
            refresh(id, "artist", &mut self.artist, &fresh.artist),
            refresh(id, "album", &mut self.album, &fresh.album),
            refresh(id, "release date", &mut self.release_date, &fresh.release_date),
            refresh(id, "duration", &mut self.duration, &fresh.duration),
        ]
        .into_iter()
        .filter(|changed| *changed)
        .count()
    }
}

/// Overwrite `current` when it differs from `fresh`.
fn refresh<T: PartialEq + Clone>(id: &str, field: &str, current: &mut T, fresh: &T) -> bool {
    if current == fresh {
        return false;
    }
    tracing::debug!("Metadata mismatch, updating {field} of song {id}");
    current.clone_from(fresh);
    true
}

/// A scored search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    /// The matching song.
    pub song: &'a SongMetadata,
    /// Best fuzzy score over the song's fields.
    pub score: i64,
}

/// All songs known to the site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Songs sorted by id.
    pub songs: Vec<SongMetadata>,
}

impl Catalog {
    /// Read every `<songs_dir>/<id>/metadata.json`.
    ///
    /// Folders without readable metadata are logged and left out.
    pub fn scan(songs_dir: &Path) -> Result<Self> {
        if !songs_dir.is_dir() {
            return Err(Error::Catalog(format!(
                "Songs path does not exist or is not a directory: {}",
                songs_dir.display()
            )));
        }

        let start = Instant::now();
        let folders: Vec<PathBuf> = WalkDir::new(songs_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_dir())
            .map(walkdir::DirEntry::into_path)
            .collect();

        let mut songs: Vec<SongMetadata> = folders
            .par_iter()
            .filter_map(|folder| match read_metadata(folder) {
                Ok(song) => Some(song),
                Err(e) => {
                    tracing::warn!("Skipping song folder {}: {e}", folder.display());
                    None
                }
            })
            .collect();
        songs.sort_by(|a, b| a.id.cmp(&b.id));

        let elapsed = start.elapsed();
        tracing::info!("Catalogued {} songs in {elapsed:?}", songs.len());
        Ok(Self { songs })
    }

    /// Load a saved index.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        let songs = serde_json::from_str(&data).map_err(|e| Error::parse(e.to_string(), path.to_path_buf()))?;
        Ok(Self { songs })
    }

    /// Write the index as pretty JSON, creating parent folders.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(|e| Error::io(e, parent.to_path_buf()))?;
        }
        let json = serde_json::to_string_pretty(&self.songs)?;
        fs_err::write(path, json).map_err(|e| Error::io(e, path.to_path_buf()))
    }

    /// Bring a saved index in line with the song folders.
    ///
    /// Indexed songs whose folder metadata disagrees on name, artist, album,
    /// release date or duration take the folder's values, and folders the
    /// index does not list yet are added. Indexed songs without a readable
    /// folder are kept as they are. Returns the number of corrections.
    pub fn reconcile(&mut self, songs_dir: &Path) -> Result<usize> {
        let folders = Self::scan(songs_dir)?;
        let mut corrections = 0;

        for song in &mut self.songs {
            let Some(fresh) = folders.get(&song.id) else {
                continue;
            };
            corrections += song.refresh_from(fresh);
        }

        for fresh in folders.songs {
            if self.get(&fresh.id).is_none() {
                tracing::debug!("Adding new song {} to the index", fresh.id);
                self.songs.push(fresh);
                corrections += 1;
            }
        }
        self.songs.sort_by(|a, b| a.id.cmp(&b.id));

        if corrections > 0 {
            tracing::info!("Reconciled catalog with {corrections} corrections");
        }
        Ok(corrections)
    }

    /// Song by id.
    pub fn get(&self, id: &str) -> Option<&SongMetadata> {
        self.songs.iter().find(|song| song.id == id)
    }

    /// Fuzzy search, best first. A blank query matches nothing.
    pub fn search(&self, query: &str, min_score: i64, limit: usize) -> Vec<SearchHit<'_>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut hits: Vec<SearchHit<'_>> = self
            .songs
            .iter()
            .filter_map(|song| {
                let score = song
                    .searchable()
                    .filter_map(|field| matcher.fuzzy_match(&field.to_lowercase(), &query))
                    .max()?;
                (score >= min_score).then_some(SearchHit { song, score })
            })
            .collect();

        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.song.id.cmp(&b.song.id)));
        hits.truncate(limit);
        hits
    }
}

/// Read one song folder's metadata, taking the id from the folder name.
fn read_metadata(folder: &Path) -> Result<SongMetadata> {
    let path = folder.join(METADATA_FILE);
    let data = fs_err::read_to_string(&path).map_err(|e| Error::io(e, path.clone()))?;
    let mut song: SongMetadata = serde_json::from_str(&data).map_err(|e| Error::parse(e.to_string(), path))?;
    if let Some(id) = folder.file_name().and_then(|n| n.to_str()) {
        song.id = id.to_string();
    }
    Ok(song)
}
