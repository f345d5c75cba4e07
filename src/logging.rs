//! Logging setup via `tracing-subscriber`.
//!
//! The library itself only emits `tracing` events. Binaries and tests pick
//! a subscriber with one of the functions here.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber at `level`.
///
/// A valid `RUST_LOG` replaces `level` entirely. Does nothing if a global
/// subscriber is already installed.
pub fn init(level: Level) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level, rust_log.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the filter from `RUST_LOG` directives, falling back to `level`
/// when they are unset, blank or unparseable.
fn env_filter(level: Level, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str()))
}

/// Install a DEBUG subscriber that writes through the test harness.
///
/// Safe to call from every test.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Map a `-v` count to a level: 0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
