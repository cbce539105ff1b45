//! Logging setup for the CLI.
//!
//! Events from the tracker library and the CLI go to stderr through the
//! tracker's `logging` subscriber, leaving stdout for command output.
//!
//! Filter resolution:
//! 1. `--verbose`: DEBUG for the tracker crates
//! 2. `--quiet`: ERROR only
//! 3. `RUST_LOG`, when set
//! 4. INFO for the tracker crates

use fob_deptrack::logging::{self, LogConfig, LogLevel};

const TARGETS: [&str; 2] = ["fob_deptrack", "fob_deptrack_cli"];

/// Subscriber settings for the given global flags.
pub fn log_config(verbose: bool, quiet: bool, no_color: bool) -> LogConfig {
    let level = if verbose {
        LogLevel::Debug
    } else if quiet {
        LogLevel::Error
    } else {
        LogLevel::Info
    };

    LogConfig {
        level,
        targets: TARGETS.iter().map(|target| target.to_string()).collect(),
        ansi: !no_color && should_use_colors(),
        use_env: !verbose && !quiet,
    }
}

/// Install the global subscriber. Call once, before any logging.
///
/// ```rust,no_run
/// use fob_deptrack_cli::logger::init_logger;
///
/// // Debug output without colors, e.g. for CI logs
/// init_logger(true, false, true);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    if !logging::init_logging(&log_config(verbose, quiet, no_color)) {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Whether stderr output should be colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
