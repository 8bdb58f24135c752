//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Lyric timing constants.
pub mod timing {
    /// Synthetic spacing between untimed plain-text lines, in milliseconds.
    pub const PLAIN_TEXT_INTERVAL_MS: u64 = 2000;
}

/// Lyric event constants.
pub mod event {
    /// Event kind assigned when a format carries none.
    pub const DEFAULT_KIND: &str = "line";
}

/// Search constants.
pub mod search {
    /// Default minimum fuzzy score for a catalog hit.
    pub const DEFAULT_MIN_SCORE: i64 = 30;

    /// Maximum number of search results to display.
    pub const MAX_SEARCH_RESULTS: usize = 20;
}

/// Song directory layout.
pub mod files {
    /// Per-song metadata file name.
    pub const METADATA_FILE: &str = "metadata.json";

    /// Per-song display configuration file name.
    pub const SONG_CONFIG_FILE: &str = "config.json";

    /// Lyric file stem; the extension is the format tag.
    pub const LYRICS_STEM: &str = "lyrics";

    /// Directory holding per-language translation arrays.
    pub const TRANSLATIONS_DIR: &str = "translations";

    /// Default catalog index location.
    pub const DEFAULT_CATALOG: &str = "config/songs.json";

    /// Default songs root directory.
    pub const DEFAULT_SONGS_DIR: &str = "songs";

    /// Default translation language.
    pub const DEFAULT_TRANSLATION_LANG: &str = "zh-CN";

    /// Default tokenizer dictionary file name under the data directory.
    pub const DEFAULT_DICT_FILE: &str = "system.dic";
}
