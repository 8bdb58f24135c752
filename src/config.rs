//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::constants::{files, search};
use crate::error::{Error, Result};

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Root directory holding one folder per song
    pub songs_dir: PathBuf,
    /// Path of the catalog index (`songs.json`)
    pub catalog_path: PathBuf,
    /// Tokenizer dictionary used by the offline converter
    pub dictionary_path: Option<PathBuf>,
    /// Translation language loaded alongside lyrics
    pub translation_lang: String,
    /// Minimum fuzzy score for catalog search hits
    pub search_min_score: i64,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            songs_dir: PathBuf::from(files::DEFAULT_SONGS_DIR),
            catalog_path: PathBuf::from(files::DEFAULT_CATALOG),
            dictionary_path: None,
            translation_lang: files::DEFAULT_TRANSLATION_LANG.to_string(),
            search_min_score: search::DEFAULT_MIN_SCORE,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(dir) = env::var("LYRICLINE_SONGS_DIR") {
            config.songs_dir = expand_path(&dir);
        }

        if let Ok(path) = env::var("LYRICLINE_CATALOG") {
            config.catalog_path = expand_path(&path);
        }

        // Dictionary: env var override, or the platform data directory
        config.dictionary_path = env::var("LYRICLINE_DICT").ok().map_or_else(
            || {
                dirs::data_dir()
                    .map(|d| d.join("lyricline").join(files::DEFAULT_DICT_FILE))
                    .filter(|p| p.is_file())
            },
            |path| Some(expand_path(&path)),
        );

        if let Ok(lang) = env::var("LYRICLINE_TRANSLATION_LANG") {
            if !lang.trim().is_empty() {
                config.translation_lang = lang.trim().to_string();
            }
        }

        if let Ok(score) = env::var("LYRICLINE_SEARCH_MIN_SCORE") {
            config.search_min_score = score.parse::<i64>().map_err(|_| {
                Error::config(
                    format!("LYRICLINE_SEARCH_MIN_SCORE is not an integer: {score}"),
                    "Set it to a whole number such as 30",
                )
            })?;
        }

        Ok(config)
    }

    /// Dictionary path, or a configuration error explaining how to set one
    pub fn require_dictionary(&self) -> Result<&PathBuf> {
        self.dictionary_path.as_ref().ok_or_else(|| {
            Error::config(
                "No tokenizer dictionary found",
                "Set LYRICLINE_DICT to an uncompressed vibrato system dictionary",
            )
        })
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}
