//! Audio source handles and the set of sources tracked for rewiring.
//!
//! A [`SourceNode`] is created by [`AudioGraphContext`](crate::AudioGraphContext)
//! but owned by the application. The routing engine only decides where its
//! output goes.

mod set;

pub use set::ConnectedSources;

use std::sync::Arc;

use crate::graph::{NodeId, NodeKind};

/// What produces a source's audio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceKind {
    /// A bare oscillator.
    Oscillator {
        /// Frequency in Hz.
        frequency_hz: f32,
    },
    /// An oscillator behind its own gain node.
    Tone {
        /// Frequency in Hz.
        frequency_hz: f32,
        /// Linear volume of the gain node.
        volume: f32,
    },
    /// Decoded media or a remote participant's stream.
    MediaStream,
}

/// Handle to an audio producer in the graph.
///
/// Cloning is cheap. Two handles are the same source when their
/// [`id()`](SourceNode::id) matches.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode {
    id: NodeId,
    kind: SourceKind,
    label: Arc<str>,
}

impl SourceNode {
    pub(crate) fn new(id: NodeId, kind: SourceKind, label: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
        }
    }

    /// The node whose output the engine wires.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// What produces this source's audio.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Label for logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Kind of the wired node (a tone is wired at its gain node).
    pub fn node_kind(&self) -> NodeKind {
        match self.kind {
            SourceKind::Oscillator { .. } => NodeKind::Oscillator,
            SourceKind::Tone { .. } => NodeKind::Gain,
            SourceKind::MediaStream => NodeKind::MediaStream,
        }
    }
}

impl std::fmt::Display for SourceNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}
