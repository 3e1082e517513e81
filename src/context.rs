//! The audio output context and the shared stereo-pan node.
//!
//! [`AudioGraphContext`] is the leaf layer under the routing engine. It opens
//! the output through an [`AudioBackend`] on first demand, creates the one pan
//! node on first demand, and hands out source nodes. Neither the output nor
//! the pan node is ever torn down once created.

use std::f32::consts::FRAC_PI_4;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{AudioBackend, OutputDevice};
use crate::graph::{AudioClock, AudioGraph, AudioParam, NodeId, NodeKind};
use crate::source::{SourceKind, SourceNode};
use crate::{ConnectionError, EventCallback, RoutingError, RoutingEvent};

/// A live output: the opened device and the graph feeding it.
#[derive(Debug)]
pub struct OutputContext {
    device: OutputDevice,
    graph: AudioGraph,
}

impl OutputContext {
    /// The opened output device.
    pub fn device(&self) -> &OutputDevice {
        &self.device
    }

    /// The graph terminating at this output.
    pub fn graph(&self) -> &AudioGraph {
        &self.graph
    }

    /// The output's clock.
    pub fn clock(&self) -> &AudioClock {
        &self.device.clock
    }

    /// Current time on the output's clock.
    pub fn now(&self) -> Duration {
        self.device.clock.now()
    }
}

struct PanNode {
    id: NodeId,
    param: AudioParam,
}

/// Owner of the output context and the stereo-pan node.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use audio_routing::{AudioGraphContext, MockBackend};
///
/// let mut context = AudioGraphContext::new(Arc::new(MockBackend::new()));
/// assert_eq!(context.pan(), 0.0);
///
/// context.set_pan(1.7, None)?;
/// assert_eq!(context.pan(), 1.0);
/// # Ok::<(), audio_routing::RoutingError>(())
/// ```
pub struct AudioGraphContext {
    backend: Arc<dyn AudioBackend>,
    output: Option<OutputContext>,
    pan: Option<PanNode>,
    event_callback: Option<EventCallback>,
}

impl AudioGraphContext {
    /// Creates a context that will open its output through `backend`.
    ///
    /// Nothing is opened until the output is first needed.
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            output: None,
            pan: None,
            event_callback: None,
        }
    }

    /// Sets the event callback.
    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    fn emit_event(&self, event: RoutingEvent) {
        if let Some(ref callback) = self.event_callback {
            callback(event);
        }
    }

    /// Name of the backend this context opens through.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Returns the output context, opening it on first call.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::AudioInit`] if the backend cannot open an
    /// output. The next call tries again.
    pub fn context(&mut self) -> Result<&OutputContext, RoutingError> {
        self.open().map(|output| &*output)
    }

    /// Returns the output context if it has been opened.
    pub fn output(&self) -> Option<&OutputContext> {
        self.output.as_ref()
    }

    /// Returns true once the output has been opened.
    pub fn is_open(&self) -> bool {
        self.output.is_some()
    }

    fn open(&mut self) -> Result<&mut OutputContext, RoutingError> {
        let output = match self.output.take() {
            Some(output) => output,
            None => self.create_output()?,
        };
        Ok(self.output.insert(output))
    }

    fn create_output(&self) -> Result<OutputContext, RoutingError> {
        let device = self.backend.open_output().inspect_err(|e| {
            tracing::error!(
                backend = self.backend.name(),
                error = %e,
                "Failed to create audio output context"
            );
        })?;

        tracing::info!(
            backend = self.backend.name(),
            device = %device.name,
            sample_rate = device.sample_rate,
            channels = device.channels,
            "Audio output context created"
        );
        self.emit_event(RoutingEvent::ContextCreated {
            backend: self.backend.name().to_string(),
            device: device.name.clone(),
            sample_rate: device.sample_rate,
            channels: device.channels,
        });

        Ok(OutputContext {
            device,
            graph: AudioGraph::new(),
        })
    }

    /// Returns the pan node, creating it on first call.
    ///
    /// `initial_pan` is clamped and applied only when the node is created.
    /// Later calls return the existing node untouched.
    pub fn pan_node(&mut self, initial_pan: f32) -> Result<NodeId, RoutingError> {
        self.ensure_pan(initial_pan).map(|pan| pan.id)
    }

    /// Returns the pan node if it has been created.
    pub fn pan_node_id(&self) -> Option<NodeId> {
        self.pan.as_ref().map(|pan| pan.id)
    }

    fn ensure_pan(&mut self, initial_pan: f32) -> Result<&mut PanNode, RoutingError> {
        let pan = match self.pan.take() {
            Some(pan) => pan,
            None => {
                let output = self.open()?;
                let now = output.now();
                let id = output.graph.add_node(NodeKind::StereoPanner);
                let mut param = AudioParam::pan();
                let value = param.set_value_at(initial_pan, now);
                tracing::debug!(node = %id, pan = value, "Stereo pan node created");
                PanNode { id, param }
            }
        };
        Ok(self.pan.insert(pan))
    }

    /// Sets the pan, clamped to [-1, 1].
    ///
    /// With `at` unset the value applies now. Otherwise it is scheduled at
    /// that time on the output clock. Creates the pan node if needed.
    /// Returns the clamped value.
    pub fn set_pan(&mut self, value: f32, at: Option<Duration>) -> Result<f32, RoutingError> {
        let now = self.open()?.now();
        let at = at.unwrap_or(now);

        let pan = self.ensure_pan(0.0)?;
        pan.param.commit(now);
        let applied = pan.param.set_value_at(value, at);

        if value.is_nan() {
            tracing::warn!(pan = applied, "NaN pan value replaced with center");
        }
        tracing::debug!(
            requested = value,
            pan = applied,
            at_s = at.as_secs_f64(),
            "Pan value set"
        );
        self.emit_event(RoutingEvent::PanChanged { value: applied, at });
        Ok(applied)
    }

    /// Returns the pan in effect now, or 0 if the pan node was never created.
    pub fn pan(&self) -> f32 {
        match (&self.pan, &self.output) {
            (Some(pan), Some(output)) => pan.param.value_at(output.now()),
            _ => 0.0,
        }
    }

    /// Number of scheduled pan changes that have not taken effect yet.
    pub fn pending_pan_changes(&self) -> usize {
        match (&self.pan, &self.output) {
            (Some(pan), Some(output)) => pan.param.pending_after(output.now()),
            _ => 0,
        }
    }

    /// Severs every outgoing connection of the pan node.
    ///
    /// A no-op when the pan node doesn't exist yet. The node itself stays
    /// and keeps its value.
    pub fn disconnect_pan_node(&mut self) -> Result<(), RoutingError> {
        if let (Some(pan), Some(output)) = (&self.pan, self.output.as_mut()) {
            let removed = output.graph.disconnect(pan.id)?;
            tracing::trace!(node = %pan.id, removed, "Pan node disconnected");
        }
        Ok(())
    }

    /// Creates an oscillator source.
    pub fn create_oscillator(&mut self, frequency_hz: f32) -> Result<SourceNode, RoutingError> {
        let output = self.open()?;
        let id = output.graph.add_node(NodeKind::Oscillator);
        Ok(SourceNode::new(
            id,
            SourceKind::Oscillator { frequency_hz },
            format!("oscillator {frequency_hz}Hz"),
        ))
    }

    /// Creates an oscillator behind a gain node. The gain node is what gets wired.
    pub fn create_tone(
        &mut self,
        frequency_hz: f32,
        volume: f32,
    ) -> Result<SourceNode, RoutingError> {
        let output = self.open()?;
        let oscillator = output.graph.add_node(NodeKind::Oscillator);
        let gain = output.graph.add_gain(volume);
        output.graph.connect(oscillator, gain)?;
        Ok(SourceNode::new(
            gain,
            SourceKind::Tone {
                frequency_hz,
                volume,
            },
            format!("tone {frequency_hz}Hz"),
        ))
    }

    /// Creates a source for a decoded media or remote stream.
    pub fn create_media_source(
        &mut self,
        label: impl Into<Arc<str>>,
    ) -> Result<SourceNode, RoutingError> {
        let output = self.open()?;
        let id = output.graph.add_node(NodeKind::MediaStream);
        Ok(SourceNode::new(id, SourceKind::MediaStream, label))
    }

    /// Marks a source as ended. It can no longer be connected.
    ///
    /// Producers feeding the source's node (a tone's oscillator) end too.
    pub fn dispose_source(&mut self, source: &SourceNode) -> Result<(), RoutingError> {
        let output = self.output.as_mut().ok_or(ConnectionError::UnknownNode {
            node: source.id(),
        })?;
        let upstream = output.graph.incoming(source.id());
        output.graph.dispose(source.id())?;
        for node in upstream {
            if output.graph.node_kind(node).is_some_and(NodeKind::is_source) {
                output.graph.dispose(node)?;
            }
        }
        tracing::debug!(source = %source, "Source disposed");
        Ok(())
    }

    /// Effective (left, right) gain from a source to the output.
    ///
    /// Sums every path to the destination. A direct path contributes unity on
    /// both channels; the pan node applies constant-power panning. Returns
    /// (0, 0) for an unrouted source.
    pub fn output_gains(&self, source: &SourceNode) -> (f32, f32) {
        let Some(output) = &self.output else {
            return (0.0, 0.0);
        };
        gains_to_output(&output.graph, source.id(), pan_gains(self.pan()))
    }

    pub(crate) fn destination(&mut self) -> Result<NodeId, RoutingError> {
        Ok(self.open()?.graph.destination())
    }

    pub(crate) fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), RoutingError> {
        self.open()?.graph.connect(from, to)?;
        Ok(())
    }

    /// Severs every outgoing connection of `node`.
    pub(crate) fn disconnect(&mut self, node: NodeId) -> Result<usize, RoutingError> {
        let output = self
            .output
            .as_mut()
            .ok_or(ConnectionError::UnknownNode { node })?;
        Ok(output.graph.disconnect(node)?)
    }
}

/// Constant-power stereo gains for a pan value.
///
/// -1 gives (1, 0), 0 gives (0.707, 0.707), 1 gives (0, 1).
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let theta = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    (theta.cos(), theta.sin())
}

fn gains_to_output(graph: &AudioGraph, node: NodeId, panner: (f32, f32)) -> (f32, f32) {
    if node == graph.destination() {
        return (1.0, 1.0);
    }

    let (mut left, mut right) = (0.0, 0.0);
    for next in graph.outgoing(node) {
        let (l, r) = gains_to_output(graph, next, panner);
        left += l;
        right += r;
    }

    match graph.node_kind(node) {
        Some(NodeKind::Gain) => {
            let gain = graph.gain(node).unwrap_or(1.0);
            (left * gain, right * gain)
        }
        Some(NodeKind::StereoPanner) => (left * panner.0, right * panner.1),
        _ => (left, right),
    }
}
