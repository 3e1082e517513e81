//! Diagnostic events emitted while routing.
//!
//! Events are a side channel for logging and metrics. Nothing in the engine
//! waits on them or changes behavior because of them. Every event is also
//! logged through `tracing`.

use std::sync::Arc;
use std::time::Duration;

use crate::graph::{NodeId, NodeKind};
use crate::RoutingMode;

/// Runtime events emitted by the context and the routing engine.
///
/// # Example
///
/// ```
/// use audio_routing::RoutingEvent;
///
/// fn handle_event(event: RoutingEvent) {
///     match event {
///         RoutingEvent::ContextCreated { backend, device, .. } => {
///             eprintln!("{backend} opened {device}");
///         }
///         RoutingEvent::ModeChanged { previous, current } => {
///             eprintln!("mode {previous} -> {current}");
///         }
///         RoutingEvent::PanChanged { value, at } => {
///             eprintln!("pan {value} at {at:?}");
///         }
///         RoutingEvent::UnrecognizedMode { requested } => {
///             eprintln!("unknown mode '{requested}', using default");
///         }
///         RoutingEvent::RewireFailed { source, error, .. } => {
///             eprintln!("source {source} not rewired: {error}");
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub enum RoutingEvent {
    /// The output context was opened.
    ContextCreated {
        /// Backend that opened it.
        backend: String,
        /// Device name.
        device: String,
        /// Output sample rate in Hz.
        sample_rate: u32,
        /// Output channel count.
        channels: u16,
    },

    /// The routing mode changed (including self-transitions).
    ModeChanged {
        /// Mode before the switch.
        previous: RoutingMode,
        /// Mode after the switch.
        current: RoutingMode,
    },

    /// A pan value was applied or scheduled.
    PanChanged {
        /// The clamped value.
        value: f32,
        /// Clock time it takes effect.
        at: Duration,
    },

    /// A mode name from outside was not recognized; `default` is used.
    UnrecognizedMode {
        /// The name that was requested.
        requested: String,
    },

    /// A source could not be rewired during a mode switch.
    ///
    /// The remaining sources were still rewired.
    RewireFailed {
        /// The source node.
        source: NodeId,
        /// Kind of the source node.
        kind: NodeKind,
        /// Mode before the switch.
        previous: RoutingMode,
        /// Mode being applied.
        current: RoutingMode,
        /// Pan value at the time of the failure.
        pan: f32,
        /// Description of the error.
        error: String,
    },
}

/// Callback type for receiving routing events.
pub type EventCallback = Arc<dyn Fn(RoutingEvent) + Send + Sync>;

/// Creates an [`EventCallback`] from a closure.
///
/// # Example
///
/// ```
/// use audio_routing::{event_callback, RoutingEvent};
///
/// let callback = event_callback(|event| {
///     println!("Got event: {:?}", event);
/// });
/// ```
pub fn event_callback<F>(f: F) -> EventCallback
where
    F: Fn(RoutingEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}
