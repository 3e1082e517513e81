//! Builder pattern for `RoutingEngine`.

use std::sync::Arc;

use crate::backend::AudioBackend;
use crate::{
    event_callback, EventCallback, RoutingConfig, RoutingEngine, RoutingError, RoutingEvent,
    RoutingMode,
};

/// Builder for configuring a [`RoutingEngine`].
///
/// Use [`RoutingEngine::builder()`] to create a new builder. Building does not
/// open the output; that happens when the first source or pan node needs it.
///
/// # Example
///
/// ```
/// use audio_routing::{MockBackend, RoutingEngine, RoutingMode};
///
/// let engine = RoutingEngine::builder()
///     .backend(MockBackend::new())
///     .initial_mode(RoutingMode::StereoPanner)
///     .initial_pan(-0.25)
///     .on_event(|e| tracing::debug!(?e, "routing event"))
///     .build()?;
///
/// assert_eq!(engine.mode(), RoutingMode::StereoPanner);
/// assert!(!engine.context().is_open());
/// # Ok::<(), audio_routing::RoutingError>(())
/// ```
#[must_use]
pub struct RoutingEngineBuilder {
    backend: Option<Arc<dyn AudioBackend>>,
    config: RoutingConfig,
    event_callback: Option<EventCallback>,
}

impl Default for RoutingEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingEngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            backend: None,
            config: RoutingConfig::default(),
            event_callback: None,
        }
    }

    /// Set the backend that opens the output.
    pub fn backend<B: AudioBackend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Set a backend that is also held elsewhere (e.g. a mock a test inspects).
    pub fn shared_backend(mut self, backend: Arc<dyn AudioBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the starting mode.
    ///
    /// Default: [`RoutingMode::Default`]
    pub fn initial_mode(mut self, mode: RoutingMode) -> Self {
        self.config.initial_mode = mode;
        self
    }

    /// Set the pan applied when the pan node is first created.
    ///
    /// Default: 0.0
    pub fn initial_pan(mut self, pan: f32) -> Self {
        self.config.initial_pan = pan;
        self
    }

    /// Set custom routing configuration.
    pub fn with_config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a callback to receive routing events.
    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: Fn(RoutingEvent) + Send + Sync + 'static,
    {
        self.event_callback = Some(event_callback(callback));
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NoBackendConfigured`] if no backend was set.
    pub fn build(self) -> Result<RoutingEngine, RoutingError> {
        let backend = self.backend.ok_or(RoutingError::NoBackendConfigured)?;
        Ok(RoutingEngine::with_parts(
            backend,
            self.config,
            self.event_callback,
        ))
    }
}
