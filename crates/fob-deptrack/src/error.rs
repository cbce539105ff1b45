//! Error types for the dependency tracker.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Top-level tracker error.
///
/// Per-module extraction failures never surface here; they are isolated and
/// reported through the diagnostics collaborator. What remains are
/// configuration problems, a broken host contract and persistence I/O.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// An ignore pattern was rejected by the glob compiler.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The host graph view could not supply the module set for a pass.
    #[error("host graph unavailable: {0}")]
    HostGraph(#[source] HostGraphError),

    /// Writing the snapshot or diagnostics file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot (de)serialization failed.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An explicitly requested configuration file does not exist.
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration could not be loaded or extracted.
    #[error("invalid tracker configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for TrackerError {
    fn from(err: figment::Error) -> Self {
        TrackerError::Config(Box::new(err))
    }
}

/// Failure raised by a host graph view.
#[derive(Debug, Clone, Error)]
pub enum HostGraphError {
    /// The view does not know the requested node.
    #[error("unknown module node: {0}")]
    UnknownNode(String),

    /// An edge points at a node the view cannot produce.
    #[error("module node {from} has a dangling connection to {to}")]
    DanglingEdge { from: String, to: String },

    /// The host reported a failure while walking connections.
    #[error("{0}")]
    Walk(String),
}
