//! # fob-deptrack
//!
//! Per-pass dependency snapshots for a bundler's module graph.
//!
//! After every compilation pass the host hands the tracker a read-only view of
//! its module graph. The tracker derives, for each file-backed module, the set
//! of files it depends on and the set of files that depend on it, applies the
//! ignore patterns to both directions and swaps the result in as the new
//! [`Snapshot`].
//!
//! ## Overview
//!
//! - **Host-agnostic**: the host only implements [`ModuleGraphView`]
//! - **Bidirectional**: every record carries `dependencies` and `usedBy`
//! - **Isolated failures**: a module whose connection walk fails keeps an
//!   empty set for that direction and the failure goes to [`Diagnostics`]
//! - **Atomic replace**: readers get the old snapshot or the new one, never a mix
//!
//! ## Architecture
//!
//! ```text
//! host "compilation finished"
//!            │
//!            ▼
//!   ┌──────────────────┐     ┌──────────────────┐
//!   │ DependencyTracker│────▶│  reconcile_pass  │
//!   └──────────────────┘     └────────┬─────────┘
//!            │                        │ per module node
//!            │                        ▼
//!            │               ┌──────────────────┐     ┌──────────────┐
//!            │               │  RecordBuilder   │────▶│ IgnorePolicy │
//!            │               └────────┬─────────┘     └──────────────┘
//!            │                        │ per direction
//!            │                        ▼
//!            │               ┌──────────────────┐     ┌──────────────┐
//!            │               │     isolate      │────▶│ Diagnostics  │
//!            │               └──────────────────┘     └──────────────┘
//!            ▼
//!   ┌──────────────────┐
//!   │   SnapshotSink   │  (development passes)
//!   └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use fob_deptrack::{BuildMode, CompilationView, DependencyTracker, ModuleId, StaticGraph};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = StaticGraph::new();
//! let index = graph.add_module(Some("/app/src/index.ts"));
//! let utils = graph.add_module(Some("/app/src/utils.ts"));
//! let react = graph.add_module(Some("/app/node_modules/react/index.js"));
//! graph.add_connection(index, utils);
//! graph.add_connection(index, react);
//!
//! let tracker = DependencyTracker::new(["**/node_modules/**"])?;
//! tracker.on_compilation_finished(&CompilationView::new(&graph, BuildMode::Production))?;
//!
//! let snapshot = tracker.snapshot();
//! let utils_id = ModuleId::new("/app/src/utils.ts")?;
//! let dependents = snapshot.dependents_of(&utils_id).unwrap();
//! assert!(dependents.contains(&ModuleId::new("/app/src/index.ts")?));
//! assert_eq!(snapshot.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod ignore;
pub mod isolation;
#[cfg(feature = "logging")]
pub mod logging;
pub mod module_id;
pub mod persistence;
pub mod reconcile;
pub mod record;
pub mod snapshot;
pub mod tracker;

pub use config::TrackerConfig;
pub use diagnostics::{
    DiagnosticEntry, Diagnostics, FileDiagnostics, MemoryDiagnostics, NoopDiagnostics,
};
pub use error::{HostGraphError, Result, TrackerError};
pub use host::{BuildMode, CompilationView, ModuleGraphView, StaticGraph, StaticModule};
pub use ignore::IgnorePolicy;
pub use isolation::isolate;
pub use module_id::{ModuleId, ModuleIdError};
pub use persistence::{JsonFileSink, SnapshotSink};
pub use reconcile::{Reconciliation, reconcile_pass};
pub use record::{DependencyRecord, Direction, ExtractionFailure, RecordBuilder, RecordOutcome};
pub use snapshot::{Snapshot, SnapshotStatistics};
pub use tracker::{DependencyTracker, DependencyTrackerBuilder, PassSummary};

#[cfg(test)]
mod tests;
