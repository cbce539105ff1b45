//! Graph reconciliation: one finished pass in, one fresh snapshot out.

use crate::diagnostics::Diagnostics;
use crate::error::{Result, TrackerError};
use crate::host::ModuleGraphView;
use crate::ignore::IgnorePolicy;
use crate::record::{RecordBuilder, RecordOutcome};
use crate::snapshot::Snapshot;

/// A reconciled pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub snapshot: Snapshot,
    /// Module nodes the host reported.
    pub visited: usize,
    /// Nodes without a backing file.
    pub unresolved: usize,
    /// Nodes whose own path is ignored.
    pub ignored: usize,
    /// Connection walks that degraded to empty sets, plus nodes skipped
    /// because their resource lookup failed.
    pub failures: usize,
}

/// Rebuild the dependency snapshot from a host graph.
///
/// Every pass starts from an empty snapshot, so modules missing from the
/// current graph are dropped. Failures walking one module's connections are
/// isolated; only a host that cannot list its modules fails the pass.
pub fn reconcile_pass<G>(
    graph: &G,
    policy: &IgnorePolicy,
    diagnostics: &dyn Diagnostics,
) -> Result<Reconciliation>
where
    G: ModuleGraphView + ?Sized,
{
    let nodes = graph.modules().map_err(TrackerError::HostGraph)?;
    let builder = RecordBuilder::new(graph, policy, diagnostics);

    let mut result = Reconciliation {
        visited: nodes.len(),
        ..Reconciliation::default()
    };

    for node in &nodes {
        match builder.build(node) {
            RecordOutcome::Built { record, failed } => {
                result.failures += failed.len();
                result.snapshot.insert(record);
            }
            RecordOutcome::Unresolved => result.unresolved += 1,
            RecordOutcome::Ignored(_) => result.ignored += 1,
            RecordOutcome::Failed => result.failures += 1,
        }
    }

    tracing::debug!(
        "Reconciled {} modules into {} records ({} unresolved, {} ignored, {} failures)",
        result.visited,
        result.snapshot.len(),
        result.unresolved,
        result.ignored,
        result.failures
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use crate::error::HostGraphError;
    use crate::host::StaticGraph;

    struct Unavailable;

    impl ModuleGraphView for Unavailable {
        type Node = ();

        fn modules(&self) -> std::result::Result<Vec<()>, HostGraphError> {
            Err(HostGraphError::Walk("compilation has no module graph".into()))
        }

        fn resource(&self, _node: &()) -> Option<String> {
            None
        }

        fn outgoing(&self, _node: &()) -> std::result::Result<Vec<()>, HostGraphError> {
            Ok(Vec::new())
        }

        fn incoming(&self, _node: &()) -> std::result::Result<Vec<()>, HostGraphError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn structural_failure_propagates() {
        let diagnostics = MemoryDiagnostics::new();
        let err = reconcile_pass(&Unavailable, &IgnorePolicy::empty(), &diagnostics).unwrap_err();
        assert!(matches!(err, TrackerError::HostGraph(_)));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn counts_every_outcome() {
        let mut graph = StaticGraph::new();
        let a = graph.add_module(Some("/app/a.js"));
        graph.add_module(None);
        graph.add_module(Some("/app/vendor/x.js"));
        graph.add_connection(a, 99);

        let policy = IgnorePolicy::new(["/app/vendor/**"]).unwrap();
        let diagnostics = MemoryDiagnostics::new();
        let result = reconcile_pass(&graph, &policy, &diagnostics).unwrap();

        assert_eq!(result.visited, 3);
        assert_eq!(result.snapshot.len(), 1);
        assert_eq!(result.unresolved, 1);
        assert_eq!(result.ignored, 1);
        assert_eq!(result.failures, 1);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn trailing_whitespace_names_a_distinct_file() {
        let mut graph = StaticGraph::new();
        graph.add_module(Some("/app/a.js"));
        graph.add_module(Some("/app/a.js "));

        let diagnostics = MemoryDiagnostics::new();
        let result = reconcile_pass(&graph, &IgnorePolicy::empty(), &diagnostics).unwrap();
        assert_eq!(result.snapshot.len(), 2);
    }

    #[test]
    fn duplicate_identities_keep_the_last_record() {
        let mut graph = StaticGraph::new();
        let first = graph.add_module(Some("/app/a.js"));
        let second = graph.add_module(Some("/app/./a.js"));
        let b = graph.add_module(Some("/app/b.js"));
        graph.add_connection(first, b);
        graph.add_connection(b, second);

        let diagnostics = MemoryDiagnostics::new();
        let result = reconcile_pass(&graph, &IgnorePolicy::empty(), &diagnostics).unwrap();

        let a = crate::ModuleId::new("/app/a.js").unwrap();
        let record = result.snapshot.get(&a).unwrap();
        assert!(record.dependencies.is_empty());
        assert_eq!(record.used_by.len(), 1);
    }
}
