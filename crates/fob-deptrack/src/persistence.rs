//! Snapshot persistence collaborator.

use std::path::{Path, PathBuf};

use crate::error::{Result, TrackerError};
use crate::snapshot::Snapshot;

/// Receives each completed snapshot the tracker decides to persist.
pub trait SnapshotSink: Send + Sync {
    fn persist(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Writes the snapshot as pretty JSON, replacing the file every pass.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for JsonFileSink {
    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        let write_err = |source| TrackerError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, json).map_err(write_err)?;

        tracing::debug!(
            "Wrote dependency snapshot with {} modules to {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(())
    }
}
