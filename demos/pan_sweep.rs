//! Pan sweep example.
//!
//! Schedules a left-to-right sweep on the output clock and prints the
//! per-channel gain of a source as the clock advances.
//!
//! Run with: cargo run --example pan_sweep

use std::sync::Arc;
use std::time::Duration;

use audio_routing::{MockBackend, PanSweep, RoutingEngine, RoutingMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // The mock clock only moves when told to, so the sweep can be stepped
    let backend = Arc::new(MockBackend::new());
    let mut engine = RoutingEngine::builder()
        .shared_backend(backend.clone())
        .initial_mode(RoutingMode::StereoPanner)
        .build()?;

    let source = engine.context_mut().create_oscillator(220.0)?;
    engine.connect_source(&source)?;

    let sweep = PanSweep::new(-1.0, 1.0, Duration::from_secs(2)).steps(8);
    let scheduled = sweep.schedule(engine.context_mut())?;
    println!("Scheduled {scheduled} pan values over {:?}", sweep.over);

    let tick = Duration::from_millis(250);
    for _ in 0..=8 {
        let (left, right) = engine.context().output_gains(&source);
        let bar = |gain: f32| "#".repeat((gain * 20.0).round() as usize);
        println!(
            "t={:>5.2}s pan {:+.2}  L {:<20} R {:<20}",
            engine.context().output().map_or(0.0, |o| o.now().as_secs_f64()),
            engine.pan(),
            bar(left),
            bar(right)
        );
        backend.clock().advance(tick);
    }

    Ok(())
}
