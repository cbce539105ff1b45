//! Command implementations.
//!
//! - [`snapshot`] - run a pass and persist it
//! - [`impact`] - transitive dependents of changed files
//! - [`stats`] - snapshot statistics
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod impact;
pub mod snapshot;
pub mod stats;

pub use impact::execute as impact_execute;
pub use snapshot::execute as snapshot_execute;
pub use stats::execute as stats_execute;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use fob_deptrack::{DependencyTracker, MemoryDiagnostics, Snapshot, StaticGraph, TrackerConfig};

use crate::cli::GraphArgs;
use crate::error::{CliError, Result};
use crate::ui;

/// Load the tracker config and append the command-line ignore patterns.
pub(crate) fn load_config(args: &GraphArgs) -> Result<TrackerConfig> {
    let mut config = TrackerConfig::load(args.config.as_deref())?;
    config.ignore.extend(args.ignore.iter().cloned());
    tracing::debug!("Ignore patterns: {:?}", config.ignore);
    Ok(config)
}

/// Read and parse a host graph dump.
pub(crate) fn load_graph(path: &Path) -> Result<StaticGraph> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph dump {}", path.display()))
        .map_err(CliError::GraphDump)?;
    let graph = StaticGraph::from_json(&json)
        .with_context(|| format!("failed to parse graph dump {}", path.display()))
        .map_err(CliError::GraphDump)?;
    tracing::debug!("Loaded {} modules from {}", graph.len(), path.display());
    Ok(graph)
}

/// Run one in-memory pass for the read-only commands.
///
/// Nothing is written to disk; failed connection walks are shown as warnings.
pub(crate) fn analyze(args: &GraphArgs) -> Result<Arc<Snapshot>> {
    let config = load_config(args)?;
    let graph = load_graph(&args.graph)?;

    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let tracker = DependencyTracker::builder()
        .ignore(&config.ignore)
        .diagnostics(diagnostics.clone())
        .build()?;
    tracker.reconcile(&graph)?;

    for entry in diagnostics.entries() {
        ui::warning(&format!("[{}] {}", entry.context, entry.message));
    }
    Ok(tracker.snapshot())
}
