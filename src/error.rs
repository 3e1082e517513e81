//! Error types for audio-routing.
//!
//! Errors are split into two categories:
//! - **Propagated errors** ([`RoutingError`]): returned to the caller of a
//!   single operation such as [`RoutingEngine::connect_source()`]
//! - **Isolated failures**: per-source problems during a mode switch, collected
//!   in a [`RewireReport`] and surfaced via [`EventCallback`](crate::EventCallback)
//!
//! [`RoutingEngine::connect_source()`]: crate::RoutingEngine::connect_source
//! [`RewireReport`]: crate::RewireReport

use crate::graph::{NodeId, NodeKind};

/// Errors returned by routing and context operations.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The output context could not be created.
    ///
    /// Audio is unavailable until a later call succeeds. Nothing retries
    /// automatically.
    #[error("audio output unavailable on backend '{backend}': {reason}")]
    AudioInit {
        /// Name of the backend that failed to open.
        backend: String,
        /// Why the backend could not open an output.
        reason: String,
    },

    /// A connect or disconnect on a specific node failed.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The engine was built without a backend.
    #[error("no audio backend configured - set one with backend()")]
    NoBackendConfigured,

    /// A delayed task was requested outside a tokio runtime.
    #[error("no tokio runtime available to schedule {task}")]
    SchedulerUnavailable {
        /// What was being scheduled.
        task: &'static str,
    },
}

impl RoutingError {
    /// Creates an init error for the given backend.
    pub fn audio_init(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AudioInit {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error came from a node connection.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// A connect or disconnect on a particular node failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    /// The node does not belong to this graph.
    #[error("unknown node {node}")]
    UnknownNode {
        /// The node that wasn't found.
        node: NodeId,
    },

    /// The node was disposed and can no longer be connected.
    #[error("{kind} node {node} is disposed")]
    Disposed {
        /// The disposed node.
        node: NodeId,
        /// What kind of node it was.
        kind: NodeKind,
    },

    /// The edge is not allowed by the graph (e.g. into a source).
    #[error("cannot connect {from} -> {to}: {reason}")]
    InvalidEdge {
        /// Upstream node.
        from: NodeId,
        /// Downstream node.
        to: NodeId,
        /// Why the edge was rejected.
        reason: &'static str,
    },
}
