//! Mode switching example.
//!
//! Connects a few sources, then walks through every routing mode and prints
//! where each source ends up.
//!
//! Run with: RUST_LOG=audio_routing=debug cargo run --example mode_switch

use std::time::Duration;

use audio_routing::{play_test_tone, MockBackend, RoutingEngine, RoutingHandle, RoutingMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let engine = RoutingEngine::builder()
        .backend(MockBackend::new())
        .initial_pan(-0.5)
        .on_event(|e| println!("  event: {e:?}"))
        .build()?;
    let handle = RoutingHandle::new(engine);

    let sources = {
        let mut engine = handle.lock();
        let voice = engine.context_mut().create_media_source("remote voice")?;
        let music = engine.context_mut().create_media_source("shared screen")?;
        engine.connect_source(&voice)?;
        engine.connect_source(&music)?;
        vec![voice, music]
    };
    let tone = play_test_tone(&handle, 440.0, 0.2, Duration::from_millis(300))?;

    // Names as a settings page would send them, including one it shouldn't
    for name in ["stereopanner", "hrtf", "surround", "stereopanner", "default"] {
        println!("\nselect_mode({name:?})");
        let report = handle.select_mode(name);

        let engine = handle.lock();
        println!("  mode is now {}, pan {:.2}", engine.mode(), engine.pan());
        for source in sources.iter().chain(std::iter::once(&tone.source)) {
            let (left, right) = engine.context().output_gains(source);
            println!(
                "  {source}: {} (L {left:.2} / R {right:.2})",
                engine.wiring_of(source)
            );
        }
        for (node, error) in report.failed() {
            println!("  {node} failed: {error}");
        }
    }

    tone.cleanup.join().await;
    println!(
        "\nTest tone finished, {} sources still connected",
        handle.lock().connected_sources().len()
    );

    let _ = handle.set_mode(RoutingMode::Default);
    Ok(())
}
