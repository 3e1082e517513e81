//! The routing engine: mode state and source rewiring.

use std::sync::Arc;

use super::report::{RewireOutcome, RewireReport};
use crate::backend::AudioBackend;
use crate::source::{ConnectedSources, SourceNode};
use crate::{
    AudioGraphContext, EventCallback, RoutingConfig, RoutingEngineBuilder, RoutingError,
    RoutingEvent, RoutingMode, Wiring,
};

/// Keeps every tracked source wired according to the current mode.
///
/// The engine owns the [`AudioGraphContext`]. All operations are synchronous
/// and take `&mut self`, so a mode switch is never observed half-done. Share
/// one engine between call sites with a [`RoutingHandle`](crate::RoutingHandle).
///
/// # Example
///
/// ```
/// use audio_routing::{MockBackend, RoutingEngine, RoutingMode, Wiring};
///
/// let mut engine = RoutingEngine::builder().backend(MockBackend::new()).build()?;
/// let voice = engine.context_mut().create_media_source("remote voice")?;
/// engine.connect_source(&voice)?;
/// assert_eq!(engine.wiring_of(&voice), Wiring::Direct);
///
/// let report = engine.set_mode(RoutingMode::StereoPanner);
/// assert!(report.is_clean());
/// assert_eq!(engine.wiring_of(&voice), Wiring::ThroughPan);
/// # Ok::<(), audio_routing::RoutingError>(())
/// ```
pub struct RoutingEngine {
    context: AudioGraphContext,
    mode: RoutingMode,
    sources: ConnectedSources,
    config: RoutingConfig,
    event_callback: Option<EventCallback>,
}

impl RoutingEngine {
    /// Creates a builder for configuring an engine.
    pub fn builder() -> RoutingEngineBuilder {
        RoutingEngineBuilder::new()
    }

    /// Creates an engine with default configuration.
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self::with_parts(backend, RoutingConfig::default(), None)
    }

    pub(crate) fn with_parts(
        backend: Arc<dyn AudioBackend>,
        config: RoutingConfig,
        event_callback: Option<EventCallback>,
    ) -> Self {
        let mut context = AudioGraphContext::new(backend);
        if let Some(callback) = event_callback.clone() {
            context = context.with_event_callback(callback);
        }
        Self {
            context,
            mode: config.initial_mode,
            sources: ConnectedSources::new(),
            config,
            event_callback,
        }
    }

    fn emit_event(&self, event: RoutingEvent) {
        if let Some(ref callback) = self.event_callback {
            callback(event);
        }
    }

    /// The current mode.
    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// The underlying context.
    pub fn context(&self) -> &AudioGraphContext {
        &self.context
    }

    /// The underlying context, for creating sources and setting the pan.
    pub fn context_mut(&mut self) -> &mut AudioGraphContext {
        &mut self.context
    }

    /// Sources currently tracked for rewiring.
    pub fn connected_sources(&self) -> &ConnectedSources {
        &self.sources
    }

    /// Sets the pan. See [`AudioGraphContext::set_pan()`].
    pub fn set_pan(&mut self, value: f32) -> Result<f32, RoutingError> {
        self.context.set_pan(value, None)
    }

    /// The pan in effect now.
    pub fn pan(&self) -> f32 {
        self.context.pan()
    }

    /// Tracks `source` and wires it for the current mode.
    ///
    /// Connecting a tracked source again keeps a single entry but still
    /// re-runs the wiring step. A source that was not tracked before and
    /// fails to wire is not kept.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::AudioInit`] if the output cannot be opened, or
    /// [`RoutingError::Connection`] if the source cannot be connected.
    pub fn connect_source(&mut self, source: &SourceNode) -> Result<(), RoutingError> {
        let newly_tracked = self.sources.insert(source.clone());

        match self.wire(source) {
            Ok(wiring) => {
                tracing::debug!(
                    source = %source,
                    mode = %self.mode,
                    %wiring,
                    newly_tracked,
                    "Source connected"
                );
                Ok(())
            }
            Err(e) => {
                if newly_tracked {
                    self.sources.remove(source.id());
                }
                tracing::warn!(
                    source = %source,
                    kind = %source.node_kind(),
                    mode = %self.mode,
                    error = %e,
                    "Failed to connect source"
                );
                Err(e)
            }
        }
    }

    /// Stops tracking `source` and severs its outgoing connections.
    ///
    /// Returns whether it was tracked. Disconnecting a disposed source is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Connection`] if the node isn't in this graph.
    pub fn disconnect_source(&mut self, source: &SourceNode) -> Result<bool, RoutingError> {
        let was_tracked = self.sources.remove(source.id());
        self.context.disconnect(source.id())?;
        tracing::debug!(source = %source, was_tracked, "Source disconnected");
        Ok(was_tracked)
    }

    /// Switches to `mode` and rewires every tracked source.
    ///
    /// Every source and the pan node are disconnected first, then the mode is
    /// recorded, then every source is connected again. Switching to the
    /// current mode runs the full cycle, which repairs wiring disturbed from
    /// outside. A source that fails is recorded in the report and logged;
    /// the others are still rewired.
    pub fn set_mode(&mut self, mode: RoutingMode) -> RewireReport {
        let previous = self.mode;
        let sources = self.sources.to_vec();
        let mut report = RewireReport::new(previous, mode);
        let mut stale = Vec::new();

        for source in &sources {
            if let Err(e) = self.context.disconnect(source.id()) {
                // Reconnecting a source that may still hold old edges could wire it twice.
                stale.push(source.id());
                self.record_failure(&mut report, source, previous, mode, e);
            }
        }
        if let Err(e) = self.context.disconnect_pan_node() {
            tracing::warn!(error = %e, "Failed to disconnect pan node");
        }

        self.mode = mode;
        tracing::info!(
            from = %previous,
            to = %mode,
            sources = sources.len(),
            pan = self.context.pan(),
            "Routing mode changed"
        );
        self.emit_event(RoutingEvent::ModeChanged {
            previous,
            current: mode,
        });

        for source in sources.iter().filter(|s| !stale.contains(&s.id())) {
            match self.wire(source) {
                Ok(wiring) => report.record(source.id(), RewireOutcome::Rewired(wiring)),
                Err(e) => self.record_failure(&mut report, source, previous, mode, e),
            }
        }

        report
    }

    /// Switches mode from an external mode name.
    ///
    /// Unknown names select [`RoutingMode::Default`] and emit
    /// [`RoutingEvent::UnrecognizedMode`]. This never fails.
    pub fn select_mode(&mut self, requested: &str) -> RewireReport {
        let mode = requested.parse::<RoutingMode>().unwrap_or_else(|_| {
            tracing::warn!(
                requested,
                fallback = %RoutingMode::Default,
                "Unrecognized routing mode"
            );
            self.emit_event(RoutingEvent::UnrecognizedMode {
                requested: requested.to_string(),
            });
            RoutingMode::Default
        });
        self.set_mode(mode)
    }

    /// Where `source`'s output currently goes.
    pub fn wiring_of(&self, source: &SourceNode) -> Wiring {
        let Some(output) = self.context.output() else {
            return Wiring::Unrouted;
        };
        let graph = output.graph();
        let destination = graph.destination();

        let direct = graph.is_connected(source.id(), destination);
        let panned = self.context.pan_node_id().is_some_and(|pan| {
            graph.is_connected(source.id(), pan) && graph.is_connected(pan, destination)
        });

        match (direct, panned) {
            (true, true) => Wiring::Conflicting,
            (true, false) => Wiring::Direct,
            (false, true) => Wiring::ThroughPan,
            (false, false) => Wiring::Unrouted,
        }
    }

    fn wire(&mut self, source: &SourceNode) -> Result<Wiring, RoutingError> {
        let destination = self.context.destination()?;
        if self.mode.uses_pan_node() {
            let pan = self.context.pan_node(self.config.initial_pan)?;
            self.context.connect(source.id(), pan)?;
            self.context.connect(pan, destination)?;
        } else {
            self.context.connect(source.id(), destination)?;
        }
        Ok(self.mode.wiring())
    }

    fn record_failure(
        &self,
        report: &mut RewireReport,
        source: &SourceNode,
        previous: RoutingMode,
        current: RoutingMode,
        error: RoutingError,
    ) {
        let pan = self.context.pan();
        tracing::warn!(
            source = %source,
            kind = %source.node_kind(),
            from = %previous,
            to = %current,
            pan,
            error = %error,
            "Failed to rewire source, continuing with the rest"
        );
        self.emit_event(RoutingEvent::RewireFailed {
            source: source.id(),
            kind: source.node_kind(),
            previous,
            current,
            pan,
            error: error.to_string(),
        });
        report.record(source.id(), RewireOutcome::Failed(error));
    }
}
