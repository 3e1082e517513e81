//! Automatable node parameters.

use std::time::Duration;

/// A node parameter with a clamped range and a timeline of scheduled values.
///
/// Every change is an event on the audio clock. The value in effect at a
/// given time is the most recent event at or before that time, or the
/// default when nothing has been applied yet. Events sharing a timestamp
/// resolve in insertion order.
#[derive(Debug, Clone)]
pub struct AudioParam {
    default: f32,
    min: f32,
    max: f32,
    timeline: Vec<ParamEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParamEvent {
    time: Duration,
    value: f32,
}

impl AudioParam {
    /// Creates a parameter with the given default and inclusive range.
    pub fn new(default: f32, min: f32, max: f32) -> Self {
        Self {
            default: default.clamp(min, max),
            min,
            max,
            timeline: Vec::new(),
        }
    }

    /// The stereo pan control: default 0, range [-1, 1].
    pub fn pan() -> Self {
        Self::new(0.0, -1.0, 1.0)
    }

    /// Lower bound.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Clamps a value into range. NaN maps to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Schedules `value` (clamped) to take effect at `time`.
    ///
    /// Returns the clamped value.
    pub fn set_value_at(&mut self, value: f32, time: Duration) -> f32 {
        let value = self.clamp(value);
        let idx = self.timeline.partition_point(|e| e.time <= time);
        self.timeline.insert(idx, ParamEvent { time, value });
        value
    }

    /// Returns the value in effect at `time`.
    pub fn value_at(&self, time: Duration) -> f32 {
        match self.timeline.partition_point(|e| e.time <= time) {
            0 => self.default,
            idx => self.timeline[idx - 1].value,
        }
    }

    /// Number of events scheduled strictly after `time`.
    pub fn pending_after(&self, time: Duration) -> usize {
        let idx = self.timeline.partition_point(|e| e.time <= time);
        self.timeline.len() - idx
    }

    /// Drops events superseded by a later event at or before `now`.
    pub fn commit(&mut self, now: Duration) {
        let applied = self.timeline.partition_point(|e| e.time <= now);
        if applied > 1 {
            self.timeline.drain(..applied - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pan_param_defaults_to_center() {
        let param = AudioParam::pan();
        assert_eq!(param.value_at(Duration::ZERO), 0.0);
        assert_eq!(param.min(), -1.0);
        assert_eq!(param.max(), 1.0);
    }

    #[test]
    fn test_clamps_to_range() {
        let mut param = AudioParam::pan();
        assert_eq!(param.set_value_at(3.5, ms(0)), 1.0);
        assert_eq!(param.set_value_at(-9.0, ms(0)), -1.0);
        assert_eq!(param.clamp(f32::INFINITY), 1.0);
        assert_eq!(param.clamp(f32::NAN), 0.0);
    }

    #[test]
    fn test_scheduled_value_applies_at_its_time() {
        let mut param = AudioParam::pan();
        param.set_value_at(0.5, ms(100));

        assert_eq!(param.value_at(ms(99)), 0.0);
        assert_eq!(param.value_at(ms(100)), 0.5);
        assert_eq!(param.pending_after(ms(50)), 1);
        assert_eq!(param.pending_after(ms(100)), 0);
    }

    #[test]
    fn test_same_time_events_resolve_in_insertion_order() {
        let mut param = AudioParam::pan();
        param.set_value_at(0.2, ms(10));
        param.set_value_at(0.4, ms(10));
        assert_eq!(param.value_at(ms(10)), 0.4);
    }

    #[test]
    fn test_out_of_order_scheduling() {
        let mut param = AudioParam::pan();
        param.set_value_at(0.9, ms(300));
        param.set_value_at(0.1, ms(100));

        assert_eq!(param.value_at(ms(200)), 0.1);
        assert_eq!(param.value_at(ms(300)), 0.9);
    }

    #[test]
    fn test_commit_keeps_current_value_and_future_events() {
        let mut param = AudioParam::pan();
        param.set_value_at(0.1, ms(0));
        param.set_value_at(0.2, ms(10));
        param.set_value_at(0.3, ms(20));
        param.set_value_at(0.4, ms(500));

        param.commit(ms(25));

        assert_eq!(param.value_at(ms(25)), 0.3);
        assert_eq!(param.pending_after(ms(25)), 1);
        assert_eq!(param.value_at(ms(500)), 0.4);
    }
}
