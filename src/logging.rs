//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `level` accepts a bare level name in any case (`INFO`, `debug`) or a full
/// `EnvFilter` directive string. Unparsable values fall back to `info`.
/// `verbose` forces `debug` regardless of `level`.
pub fn init(level: &str, verbose: bool) {
    let filter = build_filter(level, verbose);
    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_filter(level: &str, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_new(level.trim().to_ascii_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"))
}
