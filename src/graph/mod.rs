//! In-process audio graph: nodes, directed edges, and a single output sink.
//!
//! This is the primitive layer the routing engine drives. Every graph has
//! exactly one [`NodeKind::Destination`] node standing in for the hardware
//! output. Sources feed into it directly or through processing nodes.
//!
//! Mutation is crate-private: only [`AudioGraphContext`](crate::AudioGraphContext)
//! changes topology. Callers get read access for inspection.

mod clock;
mod param;

pub use clock::AudioClock;
pub use param::AudioParam;

use std::collections::{HashMap, HashSet};

use crate::ConnectionError;

/// Identifier of a node within one [`AudioGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw numeric id.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node does in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Synthesized periodic tone.
    Oscillator,
    /// Decoded media or a remote participant's stream.
    MediaStream,
    /// Volume control.
    Gain,
    /// Left/right balance control.
    StereoPanner,
    /// The hardware output sink.
    Destination,
}

impl NodeKind {
    /// Returns true for producers that have no inputs.
    pub fn is_source(self) -> bool {
        matches!(self, Self::Oscillator | Self::MediaStream)
    }

    /// Returns the kind as a short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Oscillator => "oscillator",
            Self::MediaStream => "media-stream",
            Self::Gain => "gain",
            Self::StereoPanner => "stereo-panner",
            Self::Destination => "destination",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Upstream node.
    pub from: NodeId,
    /// Downstream node.
    pub to: NodeId,
}

#[derive(Debug)]
struct NodeEntry {
    kind: NodeKind,
    /// Linear gain, only meaningful for [`NodeKind::Gain`].
    gain: f32,
    disposed: bool,
}

/// Directed audio graph terminating at one destination node.
#[derive(Debug)]
pub struct AudioGraph {
    nodes: HashMap<NodeId, NodeEntry>,
    edges: Vec<Edge>,
    destination: NodeId,
    next_id: u32,
}

impl Default for AudioGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioGraph {
    /// Creates a graph containing only the destination node.
    pub fn new() -> Self {
        let destination = NodeId(1);
        let mut nodes = HashMap::new();
        nodes.insert(
            destination,
            NodeEntry {
                kind: NodeKind::Destination,
                gain: 1.0,
                disposed: false,
            },
        );
        Self {
            nodes,
            edges: Vec::new(),
            destination,
            next_id: 2,
        }
    }

    /// The output sink.
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    /// Returns the kind of a node, if it exists.
    pub fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.get(&node).map(|n| n.kind)
    }

    /// Returns the gain of a gain node.
    pub fn gain(&self, node: NodeId) -> Option<f32> {
        self.nodes
            .get(&node)
            .filter(|n| n.kind == NodeKind::Gain)
            .map(|n| n.gain)
    }

    /// Returns true if the node exists and was disposed.
    pub fn is_disposed(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.disposed)
    }

    /// Number of nodes, including the destination and disposed nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All current edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Nodes fed by `node`.
    pub fn outgoing(&self, node: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.from == node)
            .map(|e| e.to)
            .collect()
    }

    /// Nodes feeding into `node`.
    pub fn incoming(&self, node: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.to == node)
            .map(|e| e.from)
            .collect()
    }

    /// Returns true if there is a direct edge `from -> to`.
    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    /// Returns true if `to` can be reached from `from` along edges.
    pub fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            if seen.insert(node) {
                stack.extend(self.outgoing(node));
            }
        }
        false
    }

    pub(crate) fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeEntry {
                kind,
                gain: 1.0,
                disposed: false,
            },
        );
        id
    }

    pub(crate) fn add_gain(&mut self, gain: f32) -> NodeId {
        let id = self.add_node(NodeKind::Gain);
        if let Some(entry) = self.nodes.get_mut(&id) {
            entry.gain = gain.max(0.0);
        }
        id
    }

    /// Connects `from -> to`. Connecting an existing edge again is a no-op.
    pub(crate) fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), ConnectionError> {
        let from_kind = self.live_kind(from)?;
        let to_kind = self.live_kind(to)?;

        let invalid = |reason| ConnectionError::InvalidEdge { from, to, reason };
        if from == to {
            return Err(invalid("a node cannot feed itself"));
        }
        if from_kind == NodeKind::Destination {
            return Err(invalid("the destination has no outputs"));
        }
        if to_kind.is_source() {
            return Err(invalid("sources have no inputs"));
        }
        if self.is_connected(from, to) {
            return Ok(());
        }
        if self.reaches(to, from) {
            return Err(invalid("the edge would create a cycle"));
        }

        self.edges.push(Edge { from, to });
        Ok(())
    }

    /// Removes every outgoing edge of `node`, returning how many were removed.
    ///
    /// Disconnecting a disposed node is a no-op: it has no edges left.
    pub(crate) fn disconnect(&mut self, node: NodeId) -> Result<usize, ConnectionError> {
        if !self.nodes.contains_key(&node) {
            return Err(ConnectionError::UnknownNode { node });
        }
        let before = self.edges.len();
        self.edges.retain(|e| e.from != node);
        Ok(before - self.edges.len())
    }

    /// Marks `node` as disposed and removes all edges touching it.
    pub(crate) fn dispose(&mut self, node: NodeId) -> Result<(), ConnectionError> {
        let entry = self
            .nodes
            .get_mut(&node)
            .ok_or(ConnectionError::UnknownNode { node })?;
        if entry.kind == NodeKind::Destination {
            return Err(ConnectionError::InvalidEdge {
                from: node,
                to: node,
                reason: "the destination cannot be disposed",
            });
        }
        entry.disposed = true;
        self.edges.retain(|e| e.from != node && e.to != node);
        Ok(())
    }

    fn live_kind(&self, node: NodeId) -> Result<NodeKind, ConnectionError> {
        match self.nodes.get(&node) {
            None => Err(ConnectionError::UnknownNode { node }),
            Some(entry) if entry.disposed => Err(ConnectionError::Disposed {
                node,
                kind: entry.kind,
            }),
            Some(entry) => Ok(entry.kind),
        }
    }
}
