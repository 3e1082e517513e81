//! Set of sources the engine keeps wired.

use std::collections::BTreeMap;

use super::SourceNode;
use crate::graph::NodeId;

/// Sources tracked by the routing engine, keyed by node id.
///
/// A source appears at most once. Iteration order follows node ids, which
/// keeps rewiring deterministic but carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct ConnectedSources {
    sources: BTreeMap<NodeId, SourceNode>,
}

impl ConnectedSources {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source. Returns false if it was already tracked.
    pub fn insert(&mut self, source: SourceNode) -> bool {
        match self.sources.entry(source.id()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(source);
                true
            }
        }
    }

    /// Removes a source. Returns false if it wasn't tracked.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.sources.remove(&id).is_some()
    }

    /// Returns true if the source is tracked.
    pub fn contains(&self, id: NodeId) -> bool {
        self.sources.contains_key(&id)
    }

    /// Looks up a tracked source.
    pub fn get(&self, id: NodeId) -> Option<&SourceNode> {
        self.sources.get(&id)
    }

    /// Number of tracked sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Iterates over tracked sources.
    pub fn iter(&self) -> impl Iterator<Item = &SourceNode> {
        self.sources.values()
    }

    /// Snapshot of tracked sources.
    pub(crate) fn to_vec(&self) -> Vec<SourceNode> {
        self.sources.values().cloned().collect()
    }
}
