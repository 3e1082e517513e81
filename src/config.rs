//! Configuration for the routing engine.

use crate::RoutingMode;

/// Startup configuration for a [`RoutingEngine`](crate::RoutingEngine).
///
/// # Example
///
/// ```
/// use audio_routing::{RoutingConfig, RoutingMode};
///
/// let config = RoutingConfig {
///     initial_mode: RoutingMode::StereoPanner,
///     ..Default::default()
/// };
/// assert_eq!(config.initial_pan, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    /// Mode the engine starts in.
    ///
    /// Default: [`RoutingMode::Default`]
    pub initial_mode: RoutingMode,

    /// Pan applied when the engine first creates the pan node.
    ///
    /// Clamped to [-1, 1]. Ignored once the node exists.
    /// Default: 0.0 (center)
    pub initial_pan: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            initial_mode: RoutingMode::Default,
            initial_pan: 0.0,
        }
    }
}
