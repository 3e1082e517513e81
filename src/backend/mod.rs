//! Platform audio backends.
//!
//! A backend opens the hardware output that the graph's destination node
//! stands in for. [`MockBackend`] needs no hardware and is what tests use.
//! With the `output-device` feature, `CpalBackend` opens a real device.

#[cfg(feature = "output-device")]
mod device;
mod mock;

#[cfg(feature = "output-device")]
pub use device::{default_output_device_name, list_output_devices, CpalBackend};
pub use mock::MockBackend;

use crate::graph::AudioClock;
use crate::RoutingError;

/// An output device opened by a backend.
#[derive(Debug, Clone)]
pub struct OutputDevice {
    /// Human-readable device name.
    pub name: String,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
    /// Number of output channels.
    pub channels: u16,
    /// Clock that scheduled parameter changes are measured against.
    pub clock: AudioClock,
}

/// A platform audio subsystem that can open an output.
///
/// # Example
///
/// ```
/// use audio_routing::{AudioBackend, AudioClock, OutputDevice, RoutingError};
///
/// struct Headless;
///
/// impl AudioBackend for Headless {
///     fn name(&self) -> &str {
///         "headless"
///     }
///
///     fn open_output(&self) -> Result<OutputDevice, RoutingError> {
///         Ok(OutputDevice {
///             name: "null".to_string(),
///             sample_rate: 48000,
///             channels: 2,
///             clock: AudioClock::realtime(),
///         })
///     }
/// }
/// ```
pub trait AudioBackend: Send + Sync {
    /// Name for logging and error messages.
    fn name(&self) -> &str;

    /// Opens the output.
    ///
    /// Called each time the context is requested and does not exist yet, so
    /// a failed open is retried only when the caller asks again.
    fn open_output(&self) -> Result<OutputDevice, RoutingError>;
}
