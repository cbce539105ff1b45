//! Per-pass dependency snapshot and its queries.

use std::collections::{BTreeMap, VecDeque};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::module_id::ModuleId;
use crate::record::{DependencyRecord, Direction};

/// Mapping from tracked file to its [`DependencyRecord`] for one completed pass.
///
/// Keys are ordered by path so the persisted form is stable between passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: BTreeMap<ModuleId, DependencyRecord>,
}

/// Summary counts for a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStatistics {
    pub module_count: usize,
    /// Number of distinct dependency edges.
    pub edge_count: usize,
    /// Modules nothing depends on.
    pub orphan_count: usize,
    /// Modules that depend on nothing.
    pub leaf_count: usize,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its own id, replacing any earlier record.
    pub(crate) fn insert(&mut self, record: DependencyRecord) -> Option<DependencyRecord> {
        self.records.insert(record.id.clone(), record)
    }

    pub fn get(&self, id: &ModuleId) -> Option<&DependencyRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, &DependencyRecord)> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.records.keys()
    }

    /// Files `id` depends on.
    pub fn dependencies_of(&self, id: &ModuleId) -> Option<&IndexSet<ModuleId>> {
        self.get(id).map(|record| &record.dependencies)
    }

    /// Files that depend on `id`.
    pub fn dependents_of(&self, id: &ModuleId) -> Option<&IndexSet<ModuleId>> {
        self.get(id).map(|record| &record.used_by)
    }

    /// Every module that reaches `id` through dependent edges.
    ///
    /// This is the change-impact set of `id`. Cycles are tolerated; `id`
    /// itself is never part of the result.
    pub fn transitive_dependents(&self, id: &ModuleId) -> IndexSet<ModuleId> {
        self.reachable(id, Direction::UsedBy)
    }

    /// Every module `id` reaches through dependency edges.
    pub fn transitive_dependencies(&self, id: &ModuleId) -> IndexSet<ModuleId> {
        self.reachable(id, Direction::Dependencies)
    }

    fn reachable(&self, start: &ModuleId, direction: Direction) -> IndexSet<ModuleId> {
        let mut seen = IndexSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let Some(record) = self.get(current) else {
                continue;
            };
            for next in record.set(direction) {
                if next != start && seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }

        seen
    }

    /// Records no other tracked module depends on.
    pub fn orphans(&self) -> Vec<&ModuleId> {
        self.records
            .values()
            .filter(|record| record.used_by.is_empty())
            .map(|record| &record.id)
            .collect()
    }

    pub fn statistics(&self) -> SnapshotStatistics {
        let mut stats = SnapshotStatistics {
            module_count: self.records.len(),
            ..SnapshotStatistics::default()
        };
        for record in self.records.values() {
            stats.edge_count += record.dependencies.len();
            if record.used_by.is_empty() {
                stats.orphan_count += 1;
            }
            if record.dependencies.is_empty() {
                stats.leaf_count += 1;
            }
        }
        stats
    }

    /// Persisted text form: pretty JSON keyed by path.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Export the dependency edges as DOT format for visualization.
    pub fn to_dot(&self) -> String {
        let mut output = String::from("digraph Dependencies {\n");

        for id in self.records.keys() {
            output.push_str("    \"");
            output.push_str(&escape_label(&id.path_string()));
            output.push_str("\";\n");
        }

        for record in self.records.values() {
            for target in &record.dependencies {
                output.push_str("    \"");
                output.push_str(&escape_label(&record.id.path_string()));
                output.push_str("\" -> \"");
                output.push_str(&escape_label(&target.path_string()));
                output.push_str("\";\n");
            }
        }

        output.push_str("}\n");
        output
    }
}

impl FromIterator<DependencyRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = DependencyRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

fn escape_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
