//! Pan sweeps, test tones, and delayed cleanups.
//!
//! Pan automation is scheduled on the output clock, so it is sample-accurate
//! and needs no task. Cleanups run as tokio tasks and return a
//! [`ScheduledTask`] that the owner can cancel. A cleanup that finds its
//! source already disconnected or disposed logs and exits.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::source::SourceNode;
use crate::{AudioGraphContext, RoutingEngine, RoutingError, RoutingHandle};

/// Default number of steps in a [`PanSweep`].
pub const DEFAULT_SWEEP_STEPS: u32 = 20;

/// A linear pan movement scheduled on the output clock.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use audio_routing::{AudioGraphContext, MockBackend, PanSweep};
///
/// let backend = Arc::new(MockBackend::new());
/// let mut context = AudioGraphContext::new(backend.clone());
///
/// PanSweep::new(-1.0, 1.0, Duration::from_secs(1)).steps(4).schedule(&mut context)?;
/// assert_eq!(context.pan(), -1.0);
///
/// backend.clock().advance(Duration::from_secs(1));
/// assert_eq!(context.pan(), 1.0);
/// # Ok::<(), audio_routing::RoutingError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSweep {
    /// Pan at the start.
    pub from: f32,
    /// Pan at the end.
    pub to: f32,
    /// Length of the sweep.
    pub over: Duration,
    /// Number of equal steps between `from` and `to`.
    pub steps: u32,
}

impl PanSweep {
    /// Creates a sweep with [`DEFAULT_SWEEP_STEPS`] steps.
    pub fn new(from: f32, to: f32, over: Duration) -> Self {
        Self {
            from,
            to,
            over,
            steps: DEFAULT_SWEEP_STEPS,
        }
    }

    /// Sets the number of steps (at least 1).
    #[must_use]
    pub fn steps(mut self, steps: u32) -> Self {
        self.steps = steps.max(1);
        self
    }

    /// Schedules the sweep starting now. Returns how many values were scheduled.
    pub fn schedule(&self, context: &mut AudioGraphContext) -> Result<usize, RoutingError> {
        let start = context.context()?.now();
        let steps = self.steps.max(1);

        for i in 0..=steps {
            let fraction = f64::from(i) / f64::from(steps);
            let value = self.from + (self.to - self.from) * fraction as f32;
            context.set_pan(value, Some(start + self.over.mul_f64(fraction)))?;
        }

        tracing::debug!(
            from = self.from,
            to = self.to,
            over_ms = self.over.as_millis() as u64,
            steps,
            "Pan sweep scheduled"
        );
        Ok(steps as usize + 1)
    }
}

/// A delayed task that can be cancelled before it runs.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
#[must_use = "dropping the handle leaves the task running; call cancel() to stop it"]
pub struct ScheduledTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// What this task does.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Cancels the task if it has not run yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Returns true once the task has run or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task. Returns false if it was cancelled.
    pub async fn join(self) -> bool {
        match self.handle.await {
            Ok(()) => true,
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::warn!(task = self.name, error = %e, "Scheduled task failed");
                }
                false
            }
        }
    }
}

fn current_runtime(task: &'static str) -> Result<Handle, RoutingError> {
    Handle::try_current().map_err(|_| RoutingError::SchedulerUnavailable { task })
}

fn spawn_after<F>(
    runtime: &Handle,
    name: &'static str,
    delay: Duration,
    handle: RoutingHandle,
    work: F,
) -> ScheduledTask
where
    F: FnOnce(&mut RoutingEngine) + Send + 'static,
{
    let task = async move {
        tokio::time::sleep(delay).await;
        work(&mut handle.lock());
    };
    ScheduledTask {
        name,
        handle: runtime.spawn(task),
    }
}

/// Disconnects `source` through the engine after `delay`.
///
/// # Errors
///
/// Returns [`RoutingError::SchedulerUnavailable`] outside a tokio runtime.
pub fn schedule_cleanup(
    handle: &RoutingHandle,
    source: SourceNode,
    delay: Duration,
) -> Result<ScheduledTask, RoutingError> {
    let runtime = current_runtime("source cleanup")?;
    Ok(spawn_after(
        &runtime,
        "source cleanup",
        delay,
        handle.clone(),
        move |engine| disconnect_quietly(engine, &source),
    ))
}

fn disconnect_quietly(engine: &mut RoutingEngine, source: &SourceNode) {
    match engine.disconnect_source(source) {
        Ok(true) => tracing::debug!(source = %source, "Scheduled cleanup disconnected source"),
        Ok(false) => tracing::debug!(source = %source, "Source was already untracked"),
        Err(e) => tracing::debug!(source = %source, error = %e, "Cleanup target already gone"),
    }
}

/// A tone played through the engine with its cleanup pending.
#[derive(Debug)]
pub struct TestTone {
    /// The tone's source node.
    pub source: SourceNode,
    /// Disconnects and ends the tone when it runs.
    pub cleanup: ScheduledTask,
}

/// Plays a tone through the engine for `duration`, then disconnects and ends it.
///
/// The tone follows the current routing mode like any other source.
///
/// # Errors
///
/// Returns [`RoutingError::SchedulerUnavailable`] outside a tokio runtime, or
/// any error from creating or connecting the tone. Nothing is connected when
/// an error is returned.
pub fn play_test_tone(
    handle: &RoutingHandle,
    frequency_hz: f32,
    volume: f32,
    duration: Duration,
) -> Result<TestTone, RoutingError> {
    let runtime = current_runtime("test tone cleanup")?;

    let source = {
        let mut engine = handle.lock();
        let source = engine.context_mut().create_tone(frequency_hz, volume)?;
        engine.connect_source(&source)?;
        source
    };
    tracing::debug!(
        source = %source,
        volume,
        duration_ms = duration.as_millis() as u64,
        "Test tone started"
    );

    let tone = source.clone();
    let cleanup = spawn_after(
        &runtime,
        "test tone cleanup",
        duration,
        handle.clone(),
        move |engine| {
            disconnect_quietly(engine, &tone);
            if let Err(e) = engine.context_mut().dispose_source(&tone) {
                tracing::debug!(source = %tone, error = %e, "Test tone already ended");
            }
        },
    );

    Ok(TestTone { source, cleanup })
}
