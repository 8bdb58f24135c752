//! Convert a line-timed lyric file into a structured document with furigana.
//!
//! Usage: `lrc2json <input.lrc> <output.json>`
//!
//! The tokenizer dictionary comes from `LYRICLINE_DICT` (or the default
//! data-directory location, see `Config`).

use std::path::Path;
use std::process::ExitCode;

use lyricline::config::Config;
use lyricline::furigana::tokenizer::{annotate_lrc, VibratoTokenizer};
use lyricline::logging::init_logging;

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [input, output, ..] = args.as_slice() else {
        eprintln!("Usage: lrc2json <input.lrc> <output.json>");
        return ExitCode::FAILURE;
    };

    let content = match fs_err::read_to_string(input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Failed to read input: {e}");
            return ExitCode::FAILURE;
        }
    };

    let tokenizer = match Config::load()
        .and_then(|config| config.require_dictionary().and_then(|dict| VibratoTokenizer::from_path(dict)))
    {
        Ok(tokenizer) => tokenizer,
        Err(e) => {
            eprintln!("Failed to build tokenizer: {e}");
            return ExitCode::FAILURE;
        }
    };

    let json = match annotate_lrc(&tokenizer, &content).and_then(|doc| doc.to_json_pretty()) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to annotate {input}: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs_err::write(Path::new(output), json) {
        eprintln!("Failed to write output: {e}");
        return ExitCode::FAILURE;
    }

    println!("Conversion complete, output file: {output}");
    ExitCode::SUCCESS
}
