//! Logging setup shared by the command-line tools.

use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `lyricline=info,warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lyricline=info,warn"));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
