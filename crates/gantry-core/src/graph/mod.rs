//! # Gantry Dependency Graph
//!
//! Directed graph over component keys, where an edge `a -> b` means "`a`
//! depends on `b`". The graph is derived from dependency declarations on every
//! start/stop and never cached, since declarations may change after the
//! system is assembled.
//!
//! Storage and reachability come from `petgraph`; ordering lives in [`order`].
pub mod order;

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::{all_simple_paths, has_path_connecting};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;

use crate::component::Key;
use crate::lifecycle::error::LifecycleError;
use crate::system::SystemMap;

pub use order::{topological_order, TopologicalOrder};

/// Acyclic dependency graph over component keys
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<Key, ()>,
    /// Key -> node index
    nodes: HashMap<Key, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning the existing one if the key is already present
    pub fn add_node(&mut self, key: &Key) -> NodeIndex {
        if let Some(index) = self.nodes.get(key) {
            return *index;
        }
        let index = self.graph.add_node(key.clone());
        self.nodes.insert(key.clone(), index);
        index
    }

    /// Add an edge (`dependent` depends on `dependency`).
    ///
    /// Fails without modifying the graph if the edge would close a cycle.
    pub fn add_edge(&mut self, dependent: &Key, dependency: &Key) -> Result<(), LifecycleError> {
        let from = self.add_node(dependent);
        let to = self.add_node(dependency);

        if self.graph.contains_edge(from, to) {
            return Ok(());
        }
        if from == to {
            return Err(LifecycleError::Cycle {
                path: vec![dependent.clone(), dependent.clone()],
            });
        }
        if has_path_connecting(&self.graph, to, from, None) {
            // Report the loop as dependent -> dependency -> ... -> dependent
            let existing: Vec<NodeIndex> =
                all_simple_paths::<Vec<NodeIndex>, _>(&self.graph, to, from, 0, None)
                    .next()
                    .unwrap_or_default();
            let mut path = vec![dependent.clone()];
            path.extend(existing.into_iter().map(|index| self.graph[index].clone()));
            return Err(LifecycleError::Cycle { path });
        }

        self.graph.add_edge(from, to, ());
        Ok(())
    }

    /// Check if the graph contains a node
    pub fn contains(&self, key: &Key) -> bool {
        self.nodes.contains_key(key)
    }

    /// Direct dependencies of `key`, sorted
    pub fn dependencies_of(&self, key: &Key) -> Vec<Key> {
        self.neighbors(key, Direction::Outgoing)
    }

    /// Direct dependents of `key`, sorted
    pub fn dependents_of(&self, key: &Key) -> Vec<Key> {
        self.neighbors(key, Direction::Incoming)
    }

    /// `keys` plus everything they depend on, directly or transitively.
    /// Keys absent from the graph are returned as-is.
    pub fn transitive_dependencies(&self, keys: &[Key]) -> BTreeSet<Key> {
        let mut reached = BTreeSet::new();
        for key in keys {
            let Some(start) = self.nodes.get(key) else {
                reached.insert(key.clone());
                continue;
            };
            let mut dfs = Dfs::new(&self.graph, *start);
            while let Some(index) = dfs.next(&self.graph) {
                reached.insert(self.graph[index].clone());
            }
        }
        reached
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn neighbors(&self, key: &Key, direction: Direction) -> Vec<Key> {
        let Some(index) = self.nodes.get(key) else {
            return Vec::new();
        };
        let mut keys: Vec<Key> = self
            .graph
            .neighbors_directed(*index, direction)
            .map(|neighbor| self.graph[neighbor].clone())
            .collect();
        keys.sort();
        keys
    }

    pub(crate) fn index_of(&self, key: &Key) -> Option<NodeIndex> {
        self.nodes.get(key).copied()
    }

    pub(crate) fn inner(&self) -> &DiGraph<Key, ()> {
        &self.graph
    }
}

/// Build the dependency graph for `keys` from the declarations in `system`.
///
/// Exactly the given keys become nodes. Declarations of components outside
/// the set are not read, and edges to targets outside the set are left out;
/// such targets are still resolved at injection time. Absent or nil keys in
/// the set contribute a node and no edges.
pub fn dependency_graph(
    system: &SystemMap,
    keys: &[Key],
) -> Result<DependencyGraph, LifecycleError> {
    let selected: BTreeSet<&Key> = keys.iter().collect();
    let mut graph = DependencyGraph::new();

    // Sorted insertion keeps node indices independent of caller ordering
    for key in &selected {
        graph.add_node(key);
    }
    for key in &selected {
        let Some(managed) = system.get(key) else {
            continue;
        };
        for dependency in managed.declaration().targets() {
            if selected.contains(dependency) {
                graph.add_edge(key, dependency)?;
            }
        }
    }

    log::debug!(
        "Built dependency graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
