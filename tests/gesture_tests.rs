// Host-side tests for wheel, drag and keyboard input mapping.

use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use wheel_core::gesture::ClassifierConfig;
use wheel_core::{
    key_command, DeltaMode, DragMapper, IndexStep, KeyCommand, ScrollIntentClassifier,
    WheelGestureMapper, WheelSample, WheelState,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn wheel_delta_normalizes_units_and_direction() {
    let t = Instant::now();
    let close = |a: f32, b: f32| (a - b).abs() < 1e-3;
    assert!(close(WheelSample::new(100.0, DeltaMode::Pixel, t).wheel_delta(), -120.0));
    assert!(close(WheelSample::new(-3.0, DeltaMode::Line, t).wheel_delta(), 120.0));
    assert!(close(WheelSample::new(1.0, DeltaMode::Page, t).wheel_delta(), -800.0));
    assert_eq!(DeltaMode::default(), DeltaMode::Pixel);
}

#[test]
fn classifier_default_config_matches_constants() {
    let c = ClassifierConfig::default();
    assert_eq!(c.stability, wheel_core::SCROLL_STABILITY);
    assert_eq!(c.delay, ms(wheel_core::SCROLL_DELAY_MS));
}

#[test]
fn first_tick_in_each_direction_is_intentional() {
    let t0 = Instant::now();
    let mut c = ScrollIntentClassifier::default();
    // scrolling up (negative DOM delta) moves forward
    assert_eq!(
        c.check(&WheelSample::new(-100.0, DeltaMode::Pixel, t0)),
        Some(IndexStep::Increment)
    );
    assert_eq!(
        c.check(&WheelSample::new(100.0, DeltaMode::Pixel, t0 + ms(300))),
        Some(IndexStep::Decrement)
    );
}

#[test]
fn decaying_inertial_tail_is_not_intentional() {
    let t0 = Instant::now();
    let mut c = ScrollIntentClassifier::default();
    let history = 2 * wheel_core::SCROLL_STABILITY;
    for i in 0..history + 4 {
        let dy = -(200.0 - 10.0 * i as f32);
        let got = c.check(&WheelSample::new(dy, DeltaMode::Pixel, t0 + ms(16 * i as u64)));
        if i + 1 >= history {
            assert_eq!(got, None, "sample {}", i);
        }
    }
}

#[test]
fn accelerating_scroll_is_intentional() {
    let t0 = Instant::now();
    let mut c = ScrollIntentClassifier::default();
    let history = 2 * wheel_core::SCROLL_STABILITY;
    let mut last = None;
    for i in 0..history {
        let dy = 50.0 + 10.0 * i as f32;
        last = c.check(&WheelSample::new(dy, DeltaMode::Pixel, t0 + ms(16 * i as u64)));
    }
    assert_eq!(last, Some(IndexStep::Decrement));
}

#[test]
fn constant_fast_stream_is_inertial() {
    let t0 = Instant::now();
    let mut c = ScrollIntentClassifier::default();
    let history = 2 * wheel_core::SCROLL_STABILITY;
    let mut last = None;
    for i in 0..history + 2 {
        last = c.check(&WheelSample::new(-150.0, DeltaMode::Pixel, t0 + ms(10 * i as u64)));
    }
    assert_eq!(last, None);
}

#[test]
fn wheel_mapper_ignores_input_while_closed() {
    let mut m = WheelGestureMapper::default();
    let s = WheelSample::new(-100.0, DeltaMode::Pixel, Instant::now());
    assert_eq!(m.on_wheel(&s, false), None);
    assert!(!m.in_gesture());
}

#[test]
fn wheel_mapper_emits_one_step_per_gesture() {
    let t0 = Instant::now();
    let mut m = WheelGestureMapper::default();
    let at = |n: u64| WheelSample::new(-100.0, DeltaMode::Pixel, t0 + ms(n));
    assert_eq!(m.on_wheel(&at(0), true), Some(IndexStep::Increment));
    assert!(m.in_gesture());
    assert_eq!(m.on_wheel(&at(20), true), None);
    assert_eq!(m.on_wheel(&at(40), true), None);
    // a quiet gap ends the gesture
    assert_eq!(m.on_wheel(&at(400), true), Some(IndexStep::Increment));
}

#[test]
fn wheel_mapper_ignores_events_without_vertical_motion() {
    let t0 = Instant::now();
    let mut m = WheelGestureMapper::default();
    let flat = WheelSample::new(0.0, DeltaMode::Pixel, t0);
    assert_eq!(m.on_wheel(&flat, true), None);
    assert_eq!(m.on_wheel(&WheelSample::new(f32::NAN, DeltaMode::Line, t0), true), None);
    assert!(!m.in_gesture());
    // a blank event does not use up the gesture's step
    let s = WheelSample::new(-100.0, DeltaMode::Pixel, t0 + ms(10));
    assert_eq!(m.on_wheel(&s, true), Some(IndexStep::Increment));

    let mut c = ScrollIntentClassifier::default();
    assert_eq!(c.check(&flat), None);
}

#[test]
fn wheel_mapper_end_gesture_rearms() {
    let t0 = Instant::now();
    let mut m = WheelGestureMapper::default();
    let s = WheelSample::new(3.0, DeltaMode::Line, t0);
    assert_eq!(m.on_wheel(&s, true), Some(IndexStep::Decrement));
    m.end_gesture();
    assert!(!m.in_gesture());
    let s = WheelSample::new(3.0, DeltaMode::Line, t0 + ms(10));
    assert_eq!(m.on_wheel(&s, true), Some(IndexStep::Decrement));
}

#[test]
fn drag_step_size_tracks_the_viewport() {
    let mut d = DragMapper::new(1000.0);
    assert_eq!(d.step_px(), 100.0);
    d.set_viewport_height(0.0);
    assert_eq!(d.step_px(), 1.0);
}

#[test]
fn drag_down_steps_forward_once_per_step_length() {
    let t0 = Instant::now();
    let mut d = DragMapper::new(1000.0).with_delay(Duration::ZERO);
    d.begin(0.0, t0);
    assert_eq!(d.on_move(50.0, t0, true), None);
    assert!(d.is_dragging());
    assert_eq!(d.on_move(120.0, t0, true), Some(IndexStep::Increment));
    assert_eq!(d.on_move(180.0, t0, true), None);
    assert_eq!(d.on_move(230.0, t0, true), Some(IndexStep::Increment));
    assert!(d.end());
    assert!(!d.is_pressed());
}

#[test]
fn drag_up_steps_backward() {
    let t0 = Instant::now();
    let mut d = DragMapper::new(500.0).with_delay(Duration::ZERO);
    d.begin(300.0, t0);
    assert_eq!(d.on_move(240.0, t0, true), Some(IndexStep::Decrement));
}

#[test]
fn drag_before_the_hold_delay_is_a_click() {
    let t0 = Instant::now();
    let mut d = DragMapper::new(1000.0);
    d.begin(0.0, t0);
    assert_eq!(d.on_move(400.0, t0 + ms(500), true), None);
    assert!(!d.is_dragging());
    assert!(!d.end());
}

#[test]
fn drag_after_the_hold_delay_counts_from_the_latest_position() {
    let t0 = Instant::now();
    let mut d = DragMapper::new(1000.0);
    d.begin(0.0, t0);
    d.on_move(400.0, t0 + ms(500), true);
    // travel restarts at 400, not at the press point
    assert_eq!(d.on_move(450.0, t0 + ms(1200), true), None);
    assert_eq!(d.on_move(510.0, t0 + ms(1250), true), Some(IndexStep::Increment));
}

#[test]
fn drag_jitter_is_ignored() {
    let t0 = Instant::now();
    let mut d = DragMapper::new(1000.0).with_delay(Duration::ZERO);
    d.begin(10.0, t0);
    assert_eq!(d.on_move(10.4, t0, true), None);
    assert!(!d.is_dragging());
    assert!(!d.end());
}

#[test]
fn drag_while_closed_never_steps() {
    let t0 = Instant::now();
    let mut d = DragMapper::new(100.0).with_delay(Duration::ZERO);
    d.begin(0.0, t0);
    assert_eq!(d.on_move(500.0, t0, false), None);
    assert!(d.is_dragging());
    d.cancel();
    assert!(!d.is_pressed());
    assert_eq!(d.on_move(900.0, t0, true), None);
}

#[test]
fn key_names_map_to_commands() {
    assert_eq!(key_command("ArrowUp"), Some(KeyCommand::Step(IndexStep::Increment)));
    assert_eq!(key_command("ArrowRight"), Some(KeyCommand::Step(IndexStep::Increment)));
    assert_eq!(key_command("ArrowDown"), Some(KeyCommand::Step(IndexStep::Decrement)));
    assert_eq!(key_command("ArrowLeft"), Some(KeyCommand::Step(IndexStep::Decrement)));
    assert_eq!(key_command(" "), Some(KeyCommand::ToggleOpen));
    assert_eq!(key_command("Enter"), Some(KeyCommand::ToggleOpen));
    assert_eq!(key_command("r"), Some(KeyCommand::RandomizeColors));
    assert_eq!(key_command("R"), Some(KeyCommand::RandomizeColors));
    assert_eq!(key_command("x"), None);
}

#[test]
fn key_steps_only_apply_while_open() {
    let t0 = Instant::now();
    let mut rng = StdRng::seed_from_u64(1);
    let mut store = WheelState::default();
    let start = store.index();

    KeyCommand::Step(IndexStep::Increment).apply(&mut store, t0, &mut rng);
    assert!(!store.has_pending_step());

    KeyCommand::ToggleOpen.apply(&mut store, t0, &mut rng);
    assert!(store.is_open());
    KeyCommand::Step(IndexStep::Increment).apply(&mut store, t0, &mut rng);
    store.tick(t0 + ms(100));
    assert_eq!(store.index(), start + 1);
}

#[test]
fn randomize_key_notifies() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut store = WheelState::default();
    KeyCommand::RandomizeColors.apply(&mut store, Instant::now(), &mut rng);
    assert_eq!(store.revision(), 1);
}
