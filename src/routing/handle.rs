//! Shared handle to one routing engine.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::engine::RoutingEngine;
use super::report::RewireReport;
use crate::source::SourceNode;
use crate::{RoutingError, RoutingMode};

/// Cloneable handle to a single [`RoutingEngine`].
///
/// Construct one at startup and hand clones to every call site that needs
/// routing, including scheduled cleanups. Each call locks the engine for its
/// whole duration, so a mode switch is applied as one step.
///
/// # Example
///
/// ```
/// use audio_routing::{MockBackend, RoutingEngine, RoutingHandle, RoutingMode};
///
/// let handle = RoutingHandle::new(
///     RoutingEngine::builder().backend(MockBackend::new()).build()?,
/// );
/// let ui = handle.clone();
///
/// let _ = ui.select_mode("stereopanner");
/// assert_eq!(handle.mode(), RoutingMode::StereoPanner);
/// # Ok::<(), audio_routing::RoutingError>(())
/// ```
#[derive(Clone)]
pub struct RoutingHandle {
    engine: Arc<Mutex<RoutingEngine>>,
}

impl RoutingHandle {
    /// Wraps an engine for sharing.
    pub fn new(engine: RoutingEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Locks the engine for several operations in a row.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, RoutingEngine> {
        self.engine.lock()
    }

    /// See [`RoutingEngine::mode()`].
    pub fn mode(&self) -> RoutingMode {
        self.lock().mode()
    }

    /// See [`RoutingEngine::set_mode()`].
    pub fn set_mode(&self, mode: RoutingMode) -> RewireReport {
        self.lock().set_mode(mode)
    }

    /// See [`RoutingEngine::select_mode()`].
    pub fn select_mode(&self, requested: &str) -> RewireReport {
        self.lock().select_mode(requested)
    }

    /// See [`RoutingEngine::connect_source()`].
    pub fn connect_source(&self, source: &SourceNode) -> Result<(), RoutingError> {
        self.lock().connect_source(source)
    }

    /// See [`RoutingEngine::disconnect_source()`].
    pub fn disconnect_source(&self, source: &SourceNode) -> Result<bool, RoutingError> {
        self.lock().disconnect_source(source)
    }

    /// See [`RoutingEngine::set_pan()`].
    pub fn set_pan(&self, value: f32) -> Result<f32, RoutingError> {
        self.lock().set_pan(value)
    }

    /// See [`RoutingEngine::pan()`].
    pub fn pan(&self) -> f32 {
        self.lock().pan()
    }
}
