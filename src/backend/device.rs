//! CPAL output device backend.

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::Device;

use super::{AudioBackend, OutputDevice};
use crate::graph::AudioClock;
use crate::RoutingError;

const BACKEND_NAME: &str = "cpal";

/// Opens a hardware output through CPAL's default host.
///
/// The device is looked up on every open, so an output that appears after a
/// failed attempt is picked up when the caller retries.
#[derive(Debug, Clone, Default)]
pub struct CpalBackend {
    device_name: Option<String>,
}

impl CpalBackend {
    /// Uses the system's default output device.
    pub fn default_device() -> Self {
        Self { device_name: None }
    }

    /// Uses a specific output device by name.
    pub fn device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
        }
    }

    fn find_device(&self) -> Result<Device, RoutingError> {
        let host = cpal::default_host();
        let Some(name) = &self.device_name else {
            return host
                .default_output_device()
                .ok_or_else(|| RoutingError::audio_init(BACKEND_NAME, "no default output device"));
        };

        let devices = host
            .output_devices()
            .map_err(|e| RoutingError::audio_init(BACKEND_NAME, e.to_string()))?;
        for device in devices {
            if device.name().is_ok_and(|n| n == *name) {
                return Ok(device);
            }
        }

        Err(RoutingError::audio_init(
            BACKEND_NAME,
            format!("output device not found: {name}"),
        ))
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn open_output(&self) -> Result<OutputDevice, RoutingError> {
        let device = self.find_device()?;
        let config = device
            .default_output_config()
            .map_err(|e| RoutingError::audio_init(BACKEND_NAME, e.to_string()))?;

        Ok(OutputDevice {
            name: device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate: config.sample_rate().0,
            channels: config.channels(),
            clock: AudioClock::realtime(),
        })
    }
}

/// Lists all available output devices.
///
/// # Errors
///
/// Returns an error if the audio host cannot be accessed.
pub fn list_output_devices() -> Result<Vec<String>, RoutingError> {
    let devices = cpal::default_host()
        .output_devices()
        .map_err(|e| RoutingError::audio_init(BACKEND_NAME, e.to_string()))?;

    Ok(devices.filter_map(|d| d.name().ok()).collect())
}

/// Gets the name of the default output device, if any.
pub fn default_output_device_name() -> Option<String> {
    cpal::default_host()
        .default_output_device()
        .and_then(|d| d.name().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_devices_doesnt_panic() {
        // May be empty in CI, but shouldn't panic
        let _ = list_output_devices();
    }

    #[test]
    fn test_missing_named_device_is_init_error() {
        let backend = CpalBackend::device("definitely-not-a-real-output-device");
        assert!(matches!(
            backend.open_output(),
            Err(RoutingError::AudioInit { .. })
        ));
    }
}
