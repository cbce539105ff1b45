
use std::collections::HashSet;

use crate::error::HostGraphError;
use crate::host::{ModuleGraphView, StaticGraph};
use crate::record::Direction;

/// Wraps a [`StaticGraph`] and fails chosen connection walks.
pub(crate) struct FaultyGraph {
    pub inner: StaticGraph,
    failing: HashSet<(usize, Direction)>,
    panicking: HashSet<(usize, Direction)>,
    panicking_resources: HashSet<usize>,
}

impl FaultyGraph {
    pub fn new(inner: StaticGraph) -> Self {
        Self {
            inner,
            failing: HashSet::new(),
            panicking: HashSet::new(),
            panicking_resources: HashSet::new(),
        }
    }

    pub fn fail(mut self, node: usize, direction: Direction) -> Self {
        self.failing.insert((node, direction));
        self
    }

    pub fn panic_on(mut self, node: usize, direction: Direction) -> Self {
        self.panicking.insert((node, direction));
        self
    }

    pub fn panic_on_resource(mut self, node: usize) -> Self {
        self.panicking_resources.insert(node);
        self
    }

    fn check(&self, node: usize, direction: Direction) -> Result<(), HostGraphError> {
        if self.panicking.contains(&(node, direction)) {
            panic!("host view crashed walking {direction} of node {node}");
        }
        if self.failing.contains(&(node, direction)) {
            return Err(HostGraphError::Walk(format!(
                "connection list for node {node} is unavailable"
            )));
        }
        Ok(())
    }
}

impl ModuleGraphView for FaultyGraph {
    type Node = usize;

    fn modules(&self) -> Result<Vec<usize>, HostGraphError> {
        self.inner.modules()
    }

    fn resource(&self, node: &usize) -> Option<String> {
        if self.panicking_resources.contains(node) {
            panic!("host view lost the resource of node {node}");
        }
        self.inner.resource(node)
    }

    fn outgoing(&self, node: &usize) -> Result<Vec<usize>, HostGraphError> {
        self.check(*node, Direction::Dependencies)?;
        self.inner.outgoing(node)
    }

    fn incoming(&self, node: &usize) -> Result<Vec<usize>, HostGraphError> {
        self.check(*node, Direction::UsedBy)?;
        self.inner.incoming(node)
    }
}

/// Host graph from the reference scenario: A→B, C→B.
pub(crate) fn abc_graph() -> (StaticGraph, [usize; 3]) {
    let mut graph = StaticGraph::new();
    let a = graph.add_module(Some("/project/src/a.js"));
    let b = graph.add_module(Some("/project/src/b.js"));
    let c = graph.add_module(Some("/project/src/c.js"));
    graph.add_connection(a, b);
    graph.add_connection(c, b);
    (graph, [a, b, c])
}

pub(crate) fn id(path: &str) -> crate::ModuleId {
    crate::ModuleId::new(path).expect("valid module path")
}
