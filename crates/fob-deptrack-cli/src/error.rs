//! CLI error type.
//!
//! Tracker errors convert automatically; host dump loading carries `anyhow`
//! context describing which file failed and why. Everything is rendered
//! through miette at the top of `main`.

use std::path::PathBuf;

use fob_deptrack::{ModuleIdError, TrackerError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Errors from the tracker library (config, patterns, persistence)
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// The host graph dump could not be read or parsed
    #[error("{0:#}")]
    GraphDump(anyhow::Error),

    /// A file named on the command line cannot be a module id
    #[error("invalid module path '{}': {source}", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: ModuleIdError,
    },

    /// JSON output could not be produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convert a [`CliError`] into a miette report with a hint where one helps.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Tracker(TrackerError::ConfigNotFound(path)) => miette::miette!(
            "Config file not found: {}\n\nHint: Create fob-deptrack.toml or drop --config",
            path.display()
        ),
        CliError::Tracker(TrackerError::Pattern { pattern, source }) => miette::miette!(
            "Invalid ignore pattern '{}': {}\n\nHint: Patterns use glob syntax, e.g. \"**/node_modules/**\"",
            pattern,
            source
        ),
        CliError::GraphDump(source) => miette::miette!(
            "{:#}\n\nHint: The dump must be an object with a \"modules\" array",
            source
        ),
        other => miette::miette!("{}", other),
    }
}
