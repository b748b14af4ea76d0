use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;

use crate::component::Key;
use crate::graph::DependencyGraph;
use crate::lifecycle::error::LifecycleError;

/// A total order over a key set: dependencies before dependents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    keys: Vec<Key>,
    position: HashMap<Key, usize>,
}

impl TopologicalOrder {
    /// Compare two keys by their position. Keys outside the order sort last.
    pub fn compare(&self, a: &Key, b: &Key) -> Ordering {
        let rank = |key: &Key| self.position.get(key).copied().unwrap_or(usize::MAX);
        rank(a).cmp(&rank(b))
    }

    /// Keys in start order
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Keys in stop order
    pub fn reversed(&self) -> Vec<Key> {
        self.keys.iter().rev().cloned().collect()
    }

    pub fn into_vec(self) -> Vec<Key> {
        self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Order `keys` so that every dependency precedes its dependents.
///
/// Kahn's algorithm over the graph; among keys that are ready at the same
/// time the smallest key goes first, so the result depends only on the graph
/// and the key set, never on the order `keys` were passed in. Duplicates
/// are collapsed.
pub fn topological_order(
    graph: &DependencyGraph,
    keys: &[Key],
) -> Result<TopologicalOrder, LifecycleError> {
    let selected: BTreeSet<Key> = keys.iter().cloned().collect();
    let inner = graph.inner();

    // Number of not-yet-ordered dependencies per key
    let mut pending: HashMap<&Key, usize> = HashMap::new();
    let mut ready: BTreeSet<Key> = BTreeSet::new();
    for key in &selected {
        let count = graph
            .index_of(key)
            .map(|index| {
                inner
                    .neighbors_directed(index, Direction::Outgoing)
                    .filter(|dep| selected.contains(&inner[*dep]))
                    .count()
            })
            .unwrap_or(0);
        if count == 0 {
            ready.insert(key.clone());
        }
        pending.insert(key, count);
    }

    let mut ordered = Vec::with_capacity(selected.len());
    while let Some(key) = ready.pop_first() {
        if let Some(index) = graph.index_of(&key) {
            for dependent in inner.neighbors_directed(index, Direction::Incoming) {
                let dependent = &inner[dependent];
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent.clone());
                    }
                }
            }
        }
        ordered.push(key);
    }

    if ordered.len() != selected.len() {
        // add_edge rejects cycles, so leftovers mean a corrupted graph
        let path = selected
            .iter()
            .filter(|key| !ordered.contains(key))
            .cloned()
            .collect();
        return Err(LifecycleError::Cycle { path });
    }

    let position = ordered
        .iter()
        .enumerate()
        .map(|(index, key)| (key.clone(), index))
        .collect();
    Ok(TopologicalOrder {
        keys: ordered,
        position,
    })
}
