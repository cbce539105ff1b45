//! Diagnostics collaborator.
//!
//! Isolated extraction failures are forwarded here as `(context, cause)`
//! pairs. The tracker never reads diagnostics back.

use std::error::Error as StdError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;

/// Sink for non-fatal failures.
pub trait Diagnostics: Send + Sync {
    /// Record one failure with a short context label.
    fn record(&self, context: &str, cause: &(dyn StdError + 'static));
}

/// A recorded failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub timestamp: DateTime<Utc>,
    pub context: String,
    pub message: String,
}

impl DiagnosticEntry {
    pub fn new(context: &str, cause: &(dyn StdError + 'static)) -> Self {
        Self {
            timestamp: Utc::now(),
            context: context.to_string(),
            message: error_chain(cause),
        }
    }

    /// Single-line log form: `[timestamp] [context] message`.
    pub fn to_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.context,
            self.message.replace('\n', " ")
        )
    }
}

/// Flatten an error and its sources into one `a: b: c` string.
pub fn error_chain(cause: &(dyn StdError + 'static)) -> String {
    let mut message = cause.to_string();
    let mut source = cause.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

/// Appends one timestamped line per failure to a log file.
///
/// The file is created on first use and only ever appended to.
#[derive(Debug)]
pub struct FileDiagnostics {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileDiagnostics {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl Diagnostics for FileDiagnostics {
    fn record(&self, context: &str, cause: &(dyn StdError + 'static)) {
        let entry = DiagnosticEntry::new(context, cause);
        if let Err(err) = self.append(&entry.to_line()) {
            tracing::error!(
                "Failed to append diagnostic to {}: {}",
                self.path.display(),
                err
            );
        }
    }
}

/// Keeps diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    entries: Mutex<Vec<DiagnosticEntry>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn record(&self, context: &str, cause: &(dyn StdError + 'static)) {
        self.entries.lock().push(DiagnosticEntry::new(context, cause));
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn record(&self, _context: &str, _cause: &(dyn StdError + 'static)) {}
}
