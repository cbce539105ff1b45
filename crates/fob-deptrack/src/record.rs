//! Per-module dependency records and the builder that derives them.

use std::convert::Infallible;
use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::error::HostGraphError;
use crate::host::ModuleGraphView;
use crate::ignore::IgnorePolicy;
use crate::isolation::isolate;
use crate::module_id::ModuleId;

/// Which connection list of a node is being walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Outgoing connections: files this module references.
    Dependencies,
    /// Incoming connections: files that reference this module.
    UsedBy,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Dependencies => "dependencies",
            Direction::UsedBy => "usedBy",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The dependencies and dependents of one tracked file.
///
/// Both sets are deduplicated and compare without regard to order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
    pub id: ModuleId,
    pub dependencies: IndexSet<ModuleId>,
    pub used_by: IndexSet<ModuleId>,
}

impl DependencyRecord {
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            dependencies: IndexSet::new(),
            used_by: IndexSet::new(),
        }
    }

    pub fn set(&self, direction: Direction) -> &IndexSet<ModuleId> {
        match direction {
            Direction::Dependencies => &self.dependencies,
            Direction::UsedBy => &self.used_by,
        }
    }
}

/// A connection walk failed for one module and direction.
#[derive(Debug, Error)]
#[error("failed to collect {direction} of {module}")]
pub struct ExtractionFailure {
    pub module: ModuleId,
    pub direction: Direction,
    #[source]
    pub cause: HostGraphError,
}

/// Result of building one module node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The node is tracked. `failed` lists the directions that degraded to
    /// empty sets.
    Built {
        record: DependencyRecord,
        failed: Vec<Direction>,
    },
    /// The node has no backing file.
    Unresolved,
    /// The node's own path matched the ignore policy.
    Ignored(ModuleId),
    /// Looking up the node's own resource panicked; the node is skipped.
    Failed,
}

/// Derives [`DependencyRecord`]s from a host graph view.
pub struct RecordBuilder<'a, G: ModuleGraphView + ?Sized> {
    graph: &'a G,
    policy: &'a IgnorePolicy,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a, G: ModuleGraphView + ?Sized> RecordBuilder<'a, G> {
    pub fn new(graph: &'a G, policy: &'a IgnorePolicy, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            graph,
            policy,
            diagnostics,
        }
    }

    /// Resolve a node to a tracked identity.
    ///
    /// `None` when the node has no backing file or its path is ignored. Runs
    /// unguarded; [`build`](Self::build) and [`walk`](Self::walk) call it
    /// inside an isolation boundary.
    pub fn admit(&self, node: &G::Node) -> Option<ModuleId> {
        let id = ModuleId::resolve(self.graph.resource(node).as_deref())?;
        if self.policy.should_ignore(&id.path_string()) {
            return None;
        }
        Some(id)
    }

    /// Build the record for one node.
    ///
    /// A failed walk never escapes: it is reported to the diagnostics
    /// collaborator and that direction's set stays empty. A panic while
    /// reading the node's own resource is reported under `"resource"` and
    /// yields [`RecordOutcome::Failed`].
    pub fn build(&self, node: &G::Node) -> RecordOutcome {
        let Some(resource) = isolate("resource", self.diagnostics, || {
            Ok::<_, Infallible>(self.graph.resource(node))
        }) else {
            return RecordOutcome::Failed;
        };
        let Some(id) = ModuleId::resolve(resource.as_deref()) else {
            return RecordOutcome::Unresolved;
        };
        if self.policy.should_ignore(&id.path_string()) {
            return RecordOutcome::Ignored(id);
        }

        let mut failed = Vec::new();
        let mut record = DependencyRecord::new(id);

        for direction in [Direction::Dependencies, Direction::UsedBy] {
            let collected = isolate(direction.as_str(), self.diagnostics, || {
                self.walk(&record.id, node, direction)
            });
            match (collected, direction) {
                (Some(set), Direction::Dependencies) => record.dependencies = set,
                (Some(set), Direction::UsedBy) => record.used_by = set,
                (None, _) => failed.push(direction),
            }
        }

        tracing::trace!(
            module = %record.id,
            dependencies = record.dependencies.len(),
            used_by = record.used_by.len(),
            "built dependency record"
        );

        RecordOutcome::Built { record, failed }
    }

    /// Walk one connection list, keeping resolvable, non-ignored candidates.
    pub fn walk(
        &self,
        module: &ModuleId,
        node: &G::Node,
        direction: Direction,
    ) -> Result<IndexSet<ModuleId>, ExtractionFailure> {
        let neighbours = match direction {
            Direction::Dependencies => self.graph.outgoing(node),
            Direction::UsedBy => self.graph.incoming(node),
        }
        .map_err(|cause| ExtractionFailure {
            module: module.clone(),
            direction,
            cause,
        })?;

        Ok(neighbours
            .iter()
            .filter_map(|neighbour| self.admit(neighbour))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use crate::host::StaticGraph;

    fn id(path: &str) -> ModuleId {
        ModuleId::new(path).unwrap()
    }

    #[test]
    fn parallel_connections_collapse() {
        let mut graph = StaticGraph::new();
        let a = graph.add_module(Some("/app/a.js"));
        let b = graph.add_module(Some("/app/b.js"));
        graph.add_connection(a, b);
        graph.add_connection(a, b);
        graph.add_connection(a, b);

        let policy = IgnorePolicy::empty();
        let diagnostics = MemoryDiagnostics::new();
        let builder = RecordBuilder::new(&graph, &policy, &diagnostics);

        let RecordOutcome::Built { record, failed } = builder.build(&a) else {
            panic!("a should be tracked");
        };
        assert!(failed.is_empty());
        assert_eq!(record.dependencies.len(), 1);
        assert!(record.dependencies.contains(&id("/app/b.js")));

        let RecordOutcome::Built { record, .. } = builder.build(&b) else {
            panic!("b should be tracked");
        };
        assert_eq!(record.used_by.len(), 1);
        assert!(record.used_by.contains(&id("/app/a.js")));
    }

    #[test]
    fn unresolvable_and_ignored_candidates_are_dropped() {
        let mut graph = StaticGraph::new();
        let a = graph.add_module(Some("/app/a.js"));
        let virt = graph.add_module(Some("virtual:polyfills"));
        let none = graph.add_module(None);
        let vendor = graph.add_module(Some("/app/node_modules/lib/index.js"));
        let b = graph.add_module(Some("/app/b.js"));
        for target in [virt, none, vendor, b] {
            graph.add_connection(a, target);
        }

        let policy = IgnorePolicy::new(["**/node_modules/**"]).unwrap();
        let diagnostics = MemoryDiagnostics::new();
        let builder = RecordBuilder::new(&graph, &policy, &diagnostics);

        let RecordOutcome::Built { record, .. } = builder.build(&a) else {
            panic!("a should be tracked");
        };
        assert_eq!(
            record.dependencies.iter().cloned().collect::<Vec<_>>(),
            vec![id("/app/b.js")]
        );
        assert_eq!(builder.build(&virt), RecordOutcome::Unresolved);
        assert_eq!(builder.build(&none), RecordOutcome::Unresolved);
        assert_eq!(
            builder.build(&vendor),
            RecordOutcome::Ignored(id("/app/node_modules/lib/index.js"))
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn failed_direction_degrades_to_empty_set() {
        let mut graph = StaticGraph::new();
        let a = graph.add_module(Some("/app/a.js"));
        let b = graph.add_module(Some("/app/b.js"));
        graph.add_connection(b, a);
        // Dangling edge makes the outgoing walk of `a` fail.
        graph.add_connection(a, 42);

        let policy = IgnorePolicy::empty();
        let diagnostics = MemoryDiagnostics::new();
        let builder = RecordBuilder::new(&graph, &policy, &diagnostics);

        let RecordOutcome::Built { record, failed } = builder.build(&a) else {
            panic!("a should be tracked");
        };
        assert_eq!(failed, vec![Direction::Dependencies]);
        assert!(record.dependencies.is_empty());
        assert!(record.used_by.contains(&id("/app/b.js")));

        let entries = diagnostics.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].context, "dependencies");
        assert!(entries[0].message.contains("/app/a.js"));
    }

    #[test]
    fn record_serializes_with_camel_case_sets() {
        let mut record = DependencyRecord::new(id("/app/a.js"));
        record.used_by.insert(id("/app/b.js"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["usedBy"][0], "/app/b.js");
        assert!(json["dependencies"].as_array().unwrap().is_empty());
    }
}
