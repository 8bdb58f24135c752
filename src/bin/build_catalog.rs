//! Collect every song's metadata into the catalog index.
//!
//! Usage: `build_catalog [songs_dir] [output.json]`
//!
//! Defaults come from `LYRICLINE_SONGS_DIR` and `LYRICLINE_CATALOG`.

use std::path::PathBuf;

use anyhow::Context;
use lyricline::catalog::Catalog;
use lyricline::config::Config;
use lyricline::logging::init_logging;

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::load()?;
    let mut args = std::env::args().skip(1);
    let songs_dir = args.next().map_or_else(|| config.songs_dir.clone(), PathBuf::from);
    let output = args.next().map_or_else(|| config.catalog_path.clone(), PathBuf::from);

    let catalog = Catalog::scan(&songs_dir).with_context(|| format!("scanning {}", songs_dir.display()))?;
    catalog.save(&output).with_context(|| format!("writing {}", output.display()))?;

    println!("Wrote metadata for {} songs to {}", catalog.songs.len(), output.display());
    Ok(())
}
