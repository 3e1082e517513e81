//! Integration tests for audio-routing.
//!
//! Note: Tests that require actual audio hardware are marked with
//! `#[ignore]` and should be run manually.

use std::sync::Arc;
use std::time::Duration;

use audio_routing::{
    play_test_tone, schedule_cleanup, MockBackend, PanSweep, RewireOutcome, RoutingEngine,
    RoutingError, RoutingEvent, RoutingHandle, RoutingMode, SourceNode, Wiring,
};
use parking_lot::Mutex;

const EPSILON: f32 = 1e-5;

/// Engine on a mock backend that records every event.
fn recording_engine() -> (RoutingEngine, Arc<Mutex<Vec<RoutingEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let engine = RoutingEngine::builder()
        .backend(MockBackend::new())
        .on_event(move |e| sink.lock().push(e))
        .build()
        .unwrap();
    (engine, events)
}

fn media(engine: &mut RoutingEngine, label: &str) -> SourceNode {
    engine.context_mut().create_media_source(label).unwrap()
}

fn assert_all_wired(engine: &RoutingEngine) {
    let expected = engine.mode().wiring();
    for source in engine.connected_sources().iter() {
        assert_eq!(
            engine.wiring_of(source),
            expected,
            "{source} miswired in {} mode",
            engine.mode()
        );
    }
}

#[test]
fn test_pan_is_always_clamped() {
    let (mut engine, _) = recording_engine();

    for (requested, expected) in [
        (-5.0, -1.0),
        (-1.0, -1.0),
        (-0.3, -0.3),
        (0.0, 0.0),
        (0.999, 0.999),
        (1.0, 1.0),
        (42.0, 1.0),
        (f32::INFINITY, 1.0),
        (f32::NEG_INFINITY, -1.0),
    ] {
        let applied = engine.set_pan(requested).unwrap();
        assert!((applied - expected).abs() < EPSILON, "{requested} -> {applied}");
        assert!((engine.pan() - expected).abs() < EPSILON);
    }
}

#[test]
fn test_nan_pan_centers() {
    let (mut engine, _) = recording_engine();
    engine.set_pan(0.4).unwrap();

    assert_eq!(engine.set_pan(f32::NAN).unwrap(), 0.0);
    assert_eq!(engine.pan(), 0.0);
}

#[test]
fn test_every_mode_sequence_wires_correctly() {
    let (mut engine, _) = recording_engine();
    let a = media(&mut engine, "a");
    let b = engine.context_mut().create_oscillator(220.0).unwrap();
    let c = engine.context_mut().create_tone(880.0, 0.25).unwrap();
    for source in [&a, &b, &c] {
        engine.connect_source(source).unwrap();
    }

    for first in RoutingMode::ALL {
        for second in RoutingMode::ALL {
            let report = engine.set_mode(first);
            assert!(report.is_clean());
            assert_all_wired(&engine);

            let report = engine.set_mode(second);
            assert!(report.is_clean());
            assert_eq!(report.previous(), first);
            assert_eq!(report.current(), second);
            assert_all_wired(&engine);
        }
    }
}

#[test]
fn test_pan_node_detached_outside_stereopanner() {
    let (mut engine, _) = recording_engine();
    let a = media(&mut engine, "a");
    engine.connect_source(&a).unwrap();
    let _ = engine.set_mode(RoutingMode::StereoPanner);
    let pan = engine.context().pan_node_id().unwrap();

    for mode in [RoutingMode::Default, RoutingMode::EqualPower, RoutingMode::Hrtf] {
        let _ = engine.set_mode(mode);
        let graph = engine.context().output().unwrap().graph();
        assert!(graph.outgoing(pan).is_empty(), "pan node still wired in {mode}");
        assert!(graph.incoming(pan).is_empty());
    }
}

#[test]
fn test_self_transition_is_idempotent() {
    let (mut engine, _) = recording_engine();
    let a = media(&mut engine, "a");
    let b = media(&mut engine, "b");
    engine.connect_source(&a).unwrap();
    engine.connect_source(&b).unwrap();

    for mode in RoutingMode::ALL {
        let _ = engine.set_mode(mode);
        let mut before = engine.context().output().unwrap().graph().edges().to_vec();

        let report = engine.set_mode(mode);
        let mut after = engine.context().output().unwrap().graph().edges().to_vec();

        before.sort_by_key(|e| (e.from, e.to));
        after.sort_by_key(|e| (e.from, e.to));
        assert!(report.is_clean());
        assert_eq!(before, after, "self-transition changed topology in {mode}");
    }
}

#[test]
fn test_connecting_twice_keeps_one_entry() {
    let (mut engine, _) = recording_engine();
    let _ = engine.set_mode(RoutingMode::StereoPanner);
    let a = media(&mut engine, "a");

    engine.connect_source(&a).unwrap();
    engine.connect_source(&a).unwrap();

    assert_eq!(engine.connected_sources().len(), 1);
    assert_eq!(engine.wiring_of(&a), Wiring::ThroughPan);

    let report = engine.set_mode(RoutingMode::Default);
    assert_eq!(report.len(), 1);
}

#[test]
fn test_pan_survives_mode_switches() {
    let (mut engine, _) = recording_engine();
    let _ = engine.select_mode("stereopanner");
    engine.set_pan(0.7).unwrap();

    let _ = engine.select_mode("default");
    assert!((engine.pan() - 0.7).abs() < EPSILON);

    let _ = engine.select_mode("stereopanner");
    assert!((engine.pan() - 0.7).abs() < EPSILON);
}

#[test]
fn test_hard_left_silences_right_channel() {
    let (mut engine, _) = recording_engine();
    let _ = engine.select_mode("stereopanner");
    let a = media(&mut engine, "a");
    engine.connect_source(&a).unwrap();

    engine.set_pan(-1.0).unwrap();

    let (left, right) = engine.context().output_gains(&a);
    assert!(right.abs() < EPSILON);
    assert!(left > 0.0);
}

#[test]
fn test_center_pan_is_constant_power() {
    let (mut engine, _) = recording_engine();
    let _ = engine.set_mode(RoutingMode::StereoPanner);
    let a = media(&mut engine, "a");
    engine.connect_source(&a).unwrap();

    let (left, right) = engine.context().output_gains(&a);
    assert!((left - right).abs() < EPSILON);
    assert!((left * left + right * right - 1.0).abs() < EPSILON);
}

#[test]
fn test_hrtf_routes_like_default() {
    let (mut engine, _) = recording_engine();
    let a = media(&mut engine, "a");
    engine.connect_source(&a).unwrap();

    let report = engine.select_mode("hrtf");

    assert_eq!(engine.mode(), RoutingMode::Hrtf);
    assert_eq!(
        report.outcome(a.id()).map(RewireOutcome::is_rewired),
        Some(true)
    );
    assert_eq!(engine.wiring_of(&a), Wiring::Direct);
    assert_eq!(engine.context().output_gains(&a), (1.0, 1.0));
}

#[test]
fn test_leaving_stereopanner_goes_direct() {
    let (mut engine, _) = recording_engine();
    let _ = engine.select_mode("stereopanner");
    let a = media(&mut engine, "a");
    let b = media(&mut engine, "b");
    engine.connect_source(&a).unwrap();
    engine.connect_source(&b).unwrap();

    let _ = engine.select_mode("default");

    assert_eq!(engine.wiring_of(&a), Wiring::Direct);
    assert_eq!(engine.wiring_of(&b), Wiring::Direct);
    let pan = engine.context().pan_node_id().unwrap();
    let graph = engine.context().output().unwrap().graph();
    assert!(graph.outgoing(pan).is_empty());
}

#[test]
fn test_unknown_mode_falls_back_to_default() {
    let (mut engine, events) = recording_engine();
    let _ = engine.select_mode("stereopanner");
    let a = media(&mut engine, "a");
    engine.connect_source(&a).unwrap();

    let report = engine.select_mode("surround");

    assert_eq!(engine.mode(), RoutingMode::Default);
    assert!(report.is_clean());
    assert_eq!(engine.wiring_of(&a), Wiring::Direct);

    let events = events.lock();
    assert!(events.iter().any(|e| matches!(
        e,
        RoutingEvent::UnrecognizedMode { requested } if requested == "surround"
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        RoutingEvent::ModeChanged {
            previous: RoutingMode::StereoPanner,
            current: RoutingMode::Default,
        }
    )));
}

#[test]
fn test_mode_names_are_case_sensitive() {
    let (mut engine, _) = recording_engine();

    let _ = engine.select_mode("StereoPanner");

    assert_eq!(engine.mode(), RoutingMode::Default);
}

#[test]
fn test_one_bad_source_does_not_abort_switch() {
    let (mut engine, events) = recording_engine();
    let good = media(&mut engine, "good");
    let bad = media(&mut engine, "bad");
    let other = media(&mut engine, "other");
    for source in [&good, &bad, &other] {
        engine.connect_source(source).unwrap();
    }
    engine.context_mut().dispose_source(&bad).unwrap();

    let report = engine.set_mode(RoutingMode::StereoPanner);

    assert_eq!(engine.mode(), RoutingMode::StereoPanner);
    assert!(!report.is_clean());
    assert_eq!(report.failed().count(), 1);
    assert_eq!(report.rewired().count(), 2);
    assert!(matches!(
        report.outcome(bad.id()),
        Some(RewireOutcome::Failed(RoutingError::Connection(_)))
    ));
    assert_eq!(engine.wiring_of(&good), Wiring::ThroughPan);
    assert_eq!(engine.wiring_of(&other), Wiring::ThroughPan);
    assert_eq!(engine.wiring_of(&bad), Wiring::Unrouted);

    let failures = events
        .lock()
        .iter()
        .filter(|e| matches!(e, RoutingEvent::RewireFailed { source, .. } if *source == bad.id()))
        .count();
    assert_eq!(failures, 1);
}

#[test]
fn test_output_failure_is_reported_and_retried() {
    let backend = Arc::new(MockBackend::failing(1));
    let mut engine = RoutingEngine::builder()
        .shared_backend(backend.clone())
        .build()
        .unwrap();

    let first = engine.set_pan(0.5);
    assert!(matches!(first, Err(RoutingError::AudioInit { .. })));
    assert_eq!(engine.pan(), 0.0);

    engine.set_pan(0.5).unwrap();
    assert_eq!(backend.open_attempts(), 2);
    assert!((engine.pan() - 0.5).abs() < EPSILON);
}

#[test]
fn test_pan_sweep_reaches_target() {
    let backend = Arc::new(MockBackend::new());
    let mut engine = RoutingEngine::new(backend.clone());
    let _ = engine.set_mode(RoutingMode::StereoPanner);
    let a = media(&mut engine, "a");
    engine.connect_source(&a).unwrap();

    PanSweep::new(1.0, -1.0, Duration::from_secs(2))
        .schedule(engine.context_mut())
        .unwrap();
    let (left, right) = engine.context().output_gains(&a);
    assert!(left.abs() < EPSILON && right > 0.99);

    backend.clock().advance(Duration::from_secs(2));
    let (left, right) = engine.context().output_gains(&a);
    assert!(left > 0.99 && right.abs() < EPSILON);
}

#[tokio::test]
async fn test_scheduled_cleanup_through_shared_handle() {
    let handle = RoutingHandle::new(RoutingEngine::new(Arc::new(MockBackend::new())));
    let _ = handle.select_mode("stereopanner");
    let source = handle
        .lock()
        .context_mut()
        .create_media_source("remote")
        .unwrap();
    handle.connect_source(&source).unwrap();

    let cleanup = schedule_cleanup(&handle, source.clone(), Duration::from_millis(20)).unwrap();
    let _ = handle.select_mode("default");
    assert_eq!(handle.lock().wiring_of(&source), Wiring::Direct);

    assert!(cleanup.join().await);
    let engine = handle.lock();
    assert!(engine.connected_sources().is_empty());
    assert_eq!(engine.wiring_of(&source), Wiring::Unrouted);
}

#[tokio::test]
async fn test_cancelled_cleanup_leaves_source_routed() {
    let handle = RoutingHandle::new(RoutingEngine::new(Arc::new(MockBackend::new())));
    let source = handle
        .lock()
        .context_mut()
        .create_media_source("remote")
        .unwrap();
    handle.connect_source(&source).unwrap();

    let cleanup = schedule_cleanup(&handle, source.clone(), Duration::from_millis(20)).unwrap();
    cleanup.cancel();
    tokio::time::sleep(Duration::from_millis(40)).await;

    assert!(cleanup.is_finished());
    assert_eq!(handle.lock().wiring_of(&source), Wiring::Direct);
}

#[tokio::test]
async fn test_test_tone_rewires_with_mode() {
    let handle = RoutingHandle::new(RoutingEngine::new(Arc::new(MockBackend::new())));
    let tone = play_test_tone(&handle, 440.0, 0.5, Duration::from_millis(50)).unwrap();
    assert_eq!(handle.lock().wiring_of(&tone.source), Wiring::Direct);

    let report = handle.select_mode("stereopanner");
    assert!(report.is_clean());
    assert_eq!(handle.lock().wiring_of(&tone.source), Wiring::ThroughPan);

    assert!(tone.cleanup.join().await);
    let engine = handle.lock();
    assert!(engine.connected_sources().is_empty());
    assert_eq!(engine.context().output_gains(&tone.source), (0.0, 0.0));
}

#[test]
fn test_test_tone_needs_runtime() {
    let handle = RoutingHandle::new(RoutingEngine::new(Arc::new(MockBackend::new())));

    let result = play_test_tone(&handle, 440.0, 0.5, Duration::from_millis(10));

    assert!(matches!(
        result,
        Err(RoutingError::SchedulerUnavailable { .. })
    ));
    assert!(handle.lock().connected_sources().is_empty());
}

#[cfg(feature = "output-device")]
#[test]
#[ignore = "requires audio hardware"]
fn test_real_output_device() {
    let mut engine = RoutingEngine::builder()
        .backend(audio_routing::CpalBackend::default_device())
        .build()
        .unwrap();
    let tone = engine.context_mut().create_tone(440.0, 0.1).unwrap();
    engine.connect_source(&tone).unwrap();

    let device = engine.context().output().unwrap().device();
    assert!(device.sample_rate > 0);
    assert!(device.channels > 0);
}
