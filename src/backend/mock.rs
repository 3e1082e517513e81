//! Mock backend for running the routing engine without hardware.

use std::sync::atomic::{AtomicU32, Ordering};

use super::{AudioBackend, OutputDevice};
use crate::graph::AudioClock;
use crate::RoutingError;

/// A backend that opens a virtual stereo output.
///
/// Every context it opens shares one manual [`AudioClock`], so tests can
/// move time forward with [`MockBackend::clock()`].
///
/// # Example
///
/// ```
/// use audio_routing::{AudioBackend, MockBackend};
///
/// let backend = MockBackend::failing(1);
/// assert!(backend.open_output().is_err());
/// assert!(backend.open_output().is_ok());
/// assert_eq!(backend.open_attempts(), 2);
/// ```
#[derive(Debug)]
pub struct MockBackend {
    sample_rate: u32,
    channels: u16,
    clock: AudioClock,
    fail_count: AtomicU32,
    attempts: AtomicU32,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Creates a 48kHz stereo mock output.
    pub fn new() -> Self {
        Self::with_format(48000, 2)
    }

    /// Creates a mock output with the given format.
    pub fn with_format(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            clock: AudioClock::manual(),
            fail_count: AtomicU32::new(0),
            attempts: AtomicU32::new(0),
        }
    }

    /// Creates a mock whose first `times` opens fail.
    pub fn failing(times: u32) -> Self {
        let backend = Self::new();
        backend.fail_count.store(times, Ordering::SeqCst);
        backend
    }

    /// The manual clock handed to every opened output.
    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    /// Number of times [`open_output()`](AudioBackend::open_output) was called.
    pub fn open_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl AudioBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn open_output(&self) -> Result<OutputDevice, RoutingError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let failed = self
            .fail_count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(RoutingError::audio_init(
                self.name(),
                "simulated output failure",
            ));
        }

        Ok(OutputDevice {
            name: "Mock Output".to_string(),
            sample_rate: self.sample_rate,
            channels: self.channels,
            clock: self.clock.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_mock_opens_stereo_output() {
        let backend = MockBackend::new();
        let device = backend.open_output().unwrap();
        assert_eq!(device.sample_rate, 48000);
        assert_eq!(device.channels, 2);
        assert!(device.clock.is_manual());
    }

    #[test]
    fn test_mock_failures_run_out() {
        let backend = MockBackend::failing(2);
        assert!(matches!(
            backend.open_output(),
            Err(RoutingError::AudioInit { .. })
        ));
        assert!(backend.open_output().is_err());
        assert!(backend.open_output().is_ok());
        assert_eq!(backend.open_attempts(), 3);
    }

    #[test]
    fn test_opened_clock_follows_backend_clock() {
        let backend = MockBackend::with_format(16000, 1);
        let device = backend.open_output().unwrap();
        backend.clock().advance(Duration::from_millis(40));
        assert_eq!(device.clock.now(), Duration::from_millis(40));
    }
}
