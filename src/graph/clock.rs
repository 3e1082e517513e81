//! Monotonic audio clock used to schedule parameter changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic clock of an output context.
///
/// Time starts at zero when the clock is created, which is when the output
/// context opens. Scheduled pan changes are expressed on this timeline.
///
/// A manual clock only moves when [`advance()`](AudioClock::advance) is
/// called, which makes automation deterministic in tests. Clones share the
/// same timeline.
///
/// # Example
///
/// ```
/// use audio_routing::AudioClock;
/// use std::time::Duration;
///
/// let clock = AudioClock::manual();
/// clock.advance(Duration::from_millis(250));
/// assert_eq!(clock.now(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct AudioClock {
    source: ClockSource,
}

#[derive(Debug, Clone)]
enum ClockSource {
    Realtime(Instant),
    /// Elapsed nanoseconds.
    Manual(Arc<AtomicU64>),
}

impl AudioClock {
    /// Creates a clock that follows wall time from now on.
    pub fn realtime() -> Self {
        Self {
            source: ClockSource::Realtime(Instant::now()),
        }
    }

    /// Creates a clock that stays at zero until advanced.
    pub fn manual() -> Self {
        Self {
            source: ClockSource::Manual(Arc::new(AtomicU64::new(0))),
        }
    }

    /// Returns the time elapsed on this clock.
    pub fn now(&self) -> Duration {
        match &self.source {
            ClockSource::Realtime(start) => start.elapsed(),
            ClockSource::Manual(nanos) => Duration::from_nanos(nanos.load(Ordering::SeqCst)),
        }
    }

    /// Moves a manual clock forward. Has no effect on a real-time clock.
    pub fn advance(&self, by: Duration) {
        if let ClockSource::Manual(nanos) = &self.source {
            let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
            let _ = nanos.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(by))
            });
        }
    }

    /// Returns true if this clock only moves when advanced.
    pub fn is_manual(&self) -> bool {
        matches!(self.source, ClockSource::Manual(_))
    }
}
