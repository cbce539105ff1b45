//! Host build system seam.
//!
//! The tracker never touches a bundler's concrete module types. A host adapts
//! its live module graph to [`ModuleGraphView`] and hands the tracker a
//! [`CompilationView`] once a compilation pass has finished.
//!
//! [`StaticGraph`] is an owned, serde-backed view used for graph dumps and tests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HostGraphError, Result};

/// Read-only view over a host's module/connection graph.
///
/// `outgoing` returns the modules a node depends on, `incoming` the modules
/// that depend on it. Either walk may fail; the tracker isolates such failures
/// per module and direction. A failing `modules` call means the host contract
/// itself is broken and aborts the pass.
pub trait ModuleGraphView {
    /// Opaque handle to one module node.
    type Node;

    /// All module nodes visited in the finished pass.
    fn modules(&self) -> std::result::Result<Vec<Self::Node>, HostGraphError>;

    /// Backing file path of a node, if it has one.
    fn resource(&self, node: &Self::Node) -> Option<String>;

    /// Targets of the node's outgoing connections (its dependencies).
    fn outgoing(&self, node: &Self::Node) -> std::result::Result<Vec<Self::Node>, HostGraphError>;

    /// Origins of the node's incoming connections (its dependents).
    fn incoming(&self, node: &Self::Node) -> std::result::Result<Vec<Self::Node>, HostGraphError>;
}

impl<G: ModuleGraphView + ?Sized> ModuleGraphView for &G {
    type Node = G::Node;

    fn modules(&self) -> std::result::Result<Vec<Self::Node>, HostGraphError> {
        (**self).modules()
    }

    fn resource(&self, node: &Self::Node) -> Option<String> {
        (**self).resource(node)
    }

    fn outgoing(&self, node: &Self::Node) -> std::result::Result<Vec<Self::Node>, HostGraphError> {
        (**self).outgoing(node)
    }

    fn incoming(&self, node: &Self::Node) -> std::result::Result<Vec<Self::Node>, HostGraphError> {
        (**self).incoming(node)
    }
}

/// Build mode reported by the host for a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    #[default]
    Production,
    None,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
            BuildMode::None => "none",
        }
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(BuildMode::Development),
            "production" | "prod" => Ok(BuildMode::Production),
            "none" => Ok(BuildMode::None),
            other => Err(format!("Invalid build mode: {}", other)),
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host hands over when a compilation pass finishes.
#[derive(Debug, Clone, Copy)]
pub struct CompilationView<'a, G: ?Sized> {
    pub graph: &'a G,
    pub mode: BuildMode,
}

impl<'a, G: ModuleGraphView + ?Sized> CompilationView<'a, G> {
    pub fn new(graph: &'a G, mode: BuildMode) -> Self {
        Self { graph, mode }
    }
}

/// One module in a [`StaticGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticModule {
    /// Backing file path; `None` for virtual or generated modules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    /// Indices of the modules this one depends on. Repeats model duplicate
    /// connections between the same pair of modules.
    #[serde(default)]
    pub dependencies: Vec<usize>,
}

#[derive(Deserialize)]
struct StaticGraphDump {
    modules: Vec<StaticModule>,
}

/// Owned host graph with modules addressed by index.
///
/// Incoming connections are derived from the outgoing ones, so a dump only
/// lists each edge once:
///
/// ```json
/// { "modules": [
///     { "resource": "/app/a.js", "dependencies": [1] },
///     { "resource": "/app/b.js" }
/// ] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticGraph {
    modules: Vec<StaticModule>,
    incoming: Vec<Vec<usize>>,
}

impl StaticGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from modules, deriving the incoming edge lists.
    pub fn from_modules(modules: Vec<StaticModule>) -> Self {
        let mut incoming = vec![Vec::new(); modules.len()];
        for (from, module) in modules.iter().enumerate() {
            for &to in &module.dependencies {
                if let Some(origins) = incoming.get_mut(to) {
                    origins.push(from);
                }
            }
        }
        Self { modules, incoming }
    }

    /// Parse a JSON graph dump.
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: StaticGraphDump = serde_json::from_str(json)?;
        Ok(Self::from_modules(dump.modules))
    }

    /// Add a module and return its node index.
    pub fn add_module(&mut self, resource: Option<&str>) -> usize {
        self.modules.push(StaticModule {
            resource: resource.map(str::to_string),
            dependencies: Vec::new(),
        });
        self.incoming.push(Vec::new());
        self.modules.len() - 1
    }

    /// Add a connection from `from` to `to`. Repeated calls add parallel edges.
    pub fn add_connection(&mut self, from: usize, to: usize) {
        if let Some(module) = self.modules.get_mut(from) {
            module.dependencies.push(to);
        }
        if let Some(origins) = self.incoming.get_mut(to) {
            origins.push(from);
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn module(&self, node: usize) -> std::result::Result<&StaticModule, HostGraphError> {
        self.modules
            .get(node)
            .ok_or_else(|| HostGraphError::UnknownNode(node.to_string()))
    }
}

impl ModuleGraphView for StaticGraph {
    type Node = usize;

    fn modules(&self) -> std::result::Result<Vec<usize>, HostGraphError> {
        Ok((0..self.modules.len()).collect())
    }

    fn resource(&self, node: &usize) -> Option<String> {
        self.modules.get(*node)?.resource.clone()
    }

    fn outgoing(&self, node: &usize) -> std::result::Result<Vec<usize>, HostGraphError> {
        let module = self.module(*node)?;
        if let Some(&to) = module
            .dependencies
            .iter()
            .find(|&&to| to >= self.modules.len())
        {
            return Err(HostGraphError::DanglingEdge {
                from: node.to_string(),
                to: to.to_string(),
            });
        }
        Ok(module.dependencies.clone())
    }

    fn incoming(&self, node: &usize) -> std::result::Result<Vec<usize>, HostGraphError> {
        self.module(*node)?;
        Ok(self.incoming.get(*node).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_edges_are_derived_from_dump() {
        let graph = StaticGraph::from_json(
            r#"{ "modules": [
                { "resource": "/app/a.js", "dependencies": [1] },
                { "resource": "/app/b.js" },
                { "resource": "/app/c.js", "dependencies": [1, 1] }
            ] }"#,
        )
        .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.outgoing(&2).unwrap(), vec![1, 1]);
        assert_eq!(graph.incoming(&1).unwrap(), vec![0, 2, 2]);
        assert!(graph.incoming(&0).unwrap().is_empty());
    }

    #[test]
    fn dangling_edges_fail_the_walk() {
        let graph = StaticGraph::from_modules(vec![StaticModule {
            resource: Some("/app/a.js".into()),
            dependencies: vec![7],
        }]);

        assert!(matches!(
            graph.outgoing(&0),
            Err(HostGraphError::DanglingEdge { .. })
        ));
        assert!(matches!(
            graph.outgoing(&3),
            Err(HostGraphError::UnknownNode(_))
        ));
    }

    #[test]
    fn build_mode_parses_aliases() {
        assert_eq!("dev".parse::<BuildMode>().unwrap(), BuildMode::Development);
        assert_eq!(
            "Production".parse::<BuildMode>().unwrap(),
            BuildMode::Production
        );
        assert!("staging".parse::<BuildMode>().is_err());
        assert_eq!(BuildMode::Development.to_string(), "development");
    }
}
