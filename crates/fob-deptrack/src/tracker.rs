//! The dependency tracker: owns the current snapshot and drives each pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::config::TrackerConfig;
use crate::diagnostics::{Diagnostics, FileDiagnostics, NoopDiagnostics};
use crate::error::Result;
use crate::host::{BuildMode, CompilationView, ModuleGraphView};
use crate::ignore::IgnorePolicy;
use crate::persistence::{JsonFileSink, SnapshotSink};
use crate::reconcile::{Reconciliation, reconcile_pass};
use crate::snapshot::Snapshot;

/// Outcome of one `on_compilation_finished` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// 1-based pass counter for this tracker.
    pub pass: u64,
    pub mode: BuildMode,
    pub records: usize,
    pub unresolved: usize,
    pub ignored: usize,
    pub failures: usize,
    pub persisted: bool,
}

/// Tracks which files depend on which across compilation passes.
///
/// Each pass builds a brand-new [`Snapshot`] and swaps it in whole, so
/// readers holding the result of [`snapshot`](Self::snapshot) see either the
/// previous pass or the new one, never a mix.
pub struct DependencyTracker {
    policy: IgnorePolicy,
    snapshot: RwLock<Arc<Snapshot>>,
    diagnostics: Arc<dyn Diagnostics>,
    sink: Option<Arc<dyn SnapshotSink>>,
    persist_modes: Vec<BuildMode>,
    passes: AtomicU64,
}

impl std::fmt::Debug for DependencyTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyTracker")
            .field("patterns", &self.policy.patterns())
            .field("modules", &self.snapshot.read().len())
            .field("persist_modes", &self.persist_modes)
            .field("passes", &self.passes.load(Ordering::Relaxed))
            .finish()
    }
}

impl DependencyTracker {
    /// Tracker with the given ignore patterns, no persistence and no
    /// diagnostics output.
    pub fn new<I, S>(ignore: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::builder().ignore(ignore).build()
    }

    pub fn builder() -> DependencyTrackerBuilder {
        DependencyTrackerBuilder::default()
    }

    /// Tracker wired to the well-known files named in `config`.
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        Self::builder()
            .ignore(&config.ignore)
            .diagnostics(Arc::new(FileDiagnostics::new(&config.log_path)))
            .sink(Arc::new(JsonFileSink::new(&config.snapshot_path)))
            .persist_modes(config.persist_modes.iter().copied())
            .build()
    }

    /// The current snapshot. Empty until the first pass completes.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn policy(&self) -> &IgnorePolicy {
        &self.policy
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Acquire)
    }

    /// Host hook for a finished compilation.
    ///
    /// Reconciles the graph, swaps the snapshot in and hands it to the sink
    /// when the pass's build mode qualifies. A sink failure is returned after
    /// the new snapshot is already in place.
    pub fn on_compilation_finished<G>(&self, view: &CompilationView<'_, G>) -> Result<PassSummary>
    where
        G: ModuleGraphView + ?Sized,
    {
        let reconciliation = self.reconcile(view.graph)?;
        let pass = self.passes();

        let mut summary = PassSummary {
            pass,
            mode: view.mode,
            records: reconciliation.snapshot.len(),
            unresolved: reconciliation.unresolved,
            ignored: reconciliation.ignored,
            failures: reconciliation.failures,
            persisted: false,
        };

        if let Some(sink) = self.sink.as_ref().filter(|_| self.persist_modes.contains(&view.mode)) {
            sink.persist(&reconciliation.snapshot)?;
            summary.persisted = true;
        }

        tracing::debug!(
            "Dependency pass {} ({}): {} records, {} failed walks, persisted: {}",
            summary.pass,
            summary.mode,
            summary.records,
            summary.failures,
            summary.persisted
        );

        Ok(summary)
    }

    /// Reconcile `graph` and replace the current snapshot, without persisting.
    pub fn reconcile<G>(&self, graph: &G) -> Result<Reconciliation>
    where
        G: ModuleGraphView + ?Sized,
    {
        let reconciliation = reconcile_pass(graph, &self.policy, self.diagnostics.as_ref())?;
        *self.snapshot.write() = Arc::new(reconciliation.snapshot.clone());
        self.passes.fetch_add(1, Ordering::AcqRel);
        Ok(reconciliation)
    }
}

/// Builder for [`DependencyTracker`].
pub struct DependencyTrackerBuilder {
    patterns: Vec<String>,
    diagnostics: Arc<dyn Diagnostics>,
    sink: Option<Arc<dyn SnapshotSink>>,
    persist_modes: Vec<BuildMode>,
}

impl Default for DependencyTrackerBuilder {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            diagnostics: Arc::new(NoopDiagnostics),
            sink: None,
            persist_modes: vec![BuildMode::Development],
        }
    }
}

impl DependencyTrackerBuilder {
    pub fn ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.patterns
            .extend(patterns.into_iter().map(|p| p.as_ref().to_string()));
        self
    }

    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn persist_modes<I>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = BuildMode>,
    {
        self.persist_modes = modes.into_iter().collect();
        self
    }

    /// Compile the ignore patterns and create the tracker.
    pub fn build(self) -> Result<DependencyTracker> {
        Ok(DependencyTracker {
            policy: IgnorePolicy::new(&self.patterns)?,
            snapshot: RwLock::new(Arc::new(Snapshot::new())),
            diagnostics: self.diagnostics,
            sink: self.sink,
            persist_modes: self.persist_modes,
            passes: AtomicU64::new(0),
        })
    }
}
