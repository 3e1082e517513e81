//! Mode-driven routing of connected sources.

mod engine;
mod handle;
mod report;

pub use engine::RoutingEngine;
pub use handle::RoutingHandle;
pub use report::{RewireOutcome, RewireReport};
