//! # audio-routing
//!
//! **Note:** This crate is under active development. The API may change before 1.0.
//!
//! Runtime-switchable audio output routing.
//!
//! `audio-routing` keeps a set of connected sources wired to a single audio
//! output according to a routing mode. In the default mode every source goes
//! straight to the output. In stereo-panner mode every source goes through one
//! shared pan node whose value survives mode switches. Switching modes rewires
//! every connected source as one step; a source that fails to rewire is
//! reported and skipped without aborting the switch.
//!
//! ## Quick Start
//!
//! ```rust
//! use audio_routing::{MockBackend, RoutingEngine, RoutingMode, Wiring};
//!
//! let mut engine = RoutingEngine::builder()
//!     .backend(MockBackend::new())
//!     .on_event(|e| tracing::debug!(?e, "routing event"))
//!     .build()?;
//!
//! let call = engine.context_mut().create_media_source("remote call")?;
//! engine.connect_source(&call)?;
//!
//! let report = engine.select_mode("stereopanner");
//! assert!(report.is_clean());
//! assert_eq!(engine.wiring_of(&call), Wiring::ThroughPan);
//!
//! engine.set_pan(-1.0)?;
//! let (left, right) = engine.context().output_gains(&call);
//! assert!(left > 0.99 && right < 0.01);
//!
//! let _ = engine.set_mode(RoutingMode::Default);
//! assert_eq!(engine.wiring_of(&call), Wiring::Direct);
//! # Ok::<(), audio_routing::RoutingError>(())
//! ```
//!
//! ## Architecture
//!
//! - **Backend**: opens the output lazily ([`MockBackend`] for tests, `CpalBackend`
//!   behind the `output-device` feature)
//! - **Context**: owns the output graph and the shared pan node
//! - **Engine**: tracks connected sources and the mode, and rewires on change
//! - **Handle**: shares one engine across call sites and scheduled cleanups
//!
//! Only the stereo-panner mode is wired through the pan node. The
//! `equalpower` and `hrtf` modes are accepted and route like `default`.

#![warn(missing_docs)]
// Pan math and sweep steps mix integer and float types
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
// unwrap/expect allowed in tests only
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
// These doc lints are too strict for internal implementation details
#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc)]

mod automation;
pub mod backend;
mod builder;
mod config;
mod context;
mod error;
mod event;
pub mod graph;
mod mode;
mod routing;
pub mod source;

pub use automation::{
    play_test_tone, schedule_cleanup, PanSweep, ScheduledTask, TestTone, DEFAULT_SWEEP_STEPS,
};
pub use backend::{AudioBackend, MockBackend, OutputDevice};
pub use builder::RoutingEngineBuilder;
pub use config::RoutingConfig;
pub use context::{pan_gains, AudioGraphContext, OutputContext};
pub use error::{ConnectionError, RoutingError};
pub use event::{event_callback, EventCallback, RoutingEvent};
pub use graph::{AudioClock, AudioGraph, AudioParam, Edge, NodeId, NodeKind};
pub use mode::{RoutingMode, UnrecognizedMode, Wiring};
pub use routing::{RewireOutcome, RewireReport, RoutingEngine, RoutingHandle};
pub use source::{ConnectedSources, SourceKind, SourceNode};

// Re-export real output devices when the feature is enabled
#[cfg(feature = "output-device")]
pub use backend::{default_output_device_name, list_output_devices, CpalBackend};
